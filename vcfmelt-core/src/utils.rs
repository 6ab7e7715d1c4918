use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::consts::{GZIP_MAGIC, READ_CAPACITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Plain,
    Gzip,
}

///
/// Peek at the start of a buffered stream and report whether it is gzip (or bgzf) compressed.
/// Nothing is consumed from the stream.
///
pub fn sniff_compression<R: BufRead>(reader: &mut R) -> io::Result<Compression> {
    let buf = reader.fill_buf()?;
    if buf.len() >= 2 && buf[..2] == GZIP_MAGIC {
        Ok(Compression::Gzip)
    } else {
        Ok(Compression::Plain)
    }
}

fn wrap_reader<R: Read + 'static>(inner: R) -> io::Result<(BufReader<Box<dyn Read>>, Compression)> {
    let mut peekable = BufReader::new(inner);
    let compression = sniff_compression(&mut peekable)?;

    let boxed: Box<dyn Read> = match compression {
        Compression::Gzip => Box::new(MultiGzDecoder::new(peekable)),
        Compression::Plain => Box::new(peekable),
    };

    Ok((BufReader::with_capacity(READ_CAPACITY, boxed), compression))
}

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// Compression is detected from the magic bytes, so `.vcf.gz`, `.vcf.bgz` and
/// misnamed files are all handled.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> io::Result<(BufReader<Box<dyn Read>>, Compression)> {
    let file = File::open(path)?;
    wrap_reader(file)
}

/// Get a reader for either a gzipped, non-gzipped file, or stdin
///
/// # Arguments
///
/// - file_path: path to the file to read, or '-' for stdin
///
pub fn get_dynamic_reader_w_stdin(
    file_path_str: &str,
) -> io::Result<(BufReader<Box<dyn Read>>, Compression)> {
    if file_path_str == "-" {
        wrap_reader(io::stdin())
    } else {
        get_dynamic_reader(Path::new(file_path_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use flate2::write::GzEncoder;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const CONTENT: &str = "##fileformat=VCFv4.2\n#CHROM\tPOS\n";

    #[rstest]
    fn test_plain_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.vcf");
        std::fs::write(&path, CONTENT).unwrap();

        let (mut reader, compression) = get_dynamic_reader(&path).unwrap();
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();

        assert_eq!(compression, Compression::Plain);
        assert_eq!(text, CONTENT);
    }

    #[rstest]
    fn test_gzip_reader_ignores_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_extension");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), flate2::Compression::fast());
        encoder.write_all(CONTENT.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let (mut reader, compression) = get_dynamic_reader(&path).unwrap();
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();

        assert_eq!(compression, Compression::Gzip);
        assert_eq!(text, CONTENT);
    }

    #[rstest]
    fn test_missing_file() {
        let result = get_dynamic_reader(Path::new("does/not/exist.vcf"));
        assert!(result.is_err());
    }
}
