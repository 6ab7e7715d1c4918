use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use log::warn;

use vcfmelt_annotate::schema::field_column_names;
use vcfmelt_annotate::table::output_columns;
use vcfmelt_annotate::{AnnotatedTable, AnnotationConfig};

use crate::header::VcfHeader;

///
/// Streams annotated tables into one tab separated file with a fixed column list.
///
/// The column list is decided up front, usually from the `##FORMAT` lines of the
/// header, so every chunk lands under the same header row. When no FORMAT columns
/// are known in advance, the first table written decides them.
///
pub struct AnnotatedTsvWriter<W: Write> {
    inner: W,
    field_columns: Vec<String>,
    with_hom_ref: bool,
    columns: Vec<String>,
    header_written: bool,
    warned: bool,
    rows_written: usize,
}

impl<W: Write> AnnotatedTsvWriter<W> {
    pub fn new(inner: W, field_columns: Vec<String>, with_hom_ref: bool) -> Self {
        let columns = output_columns(&field_columns, with_hom_ref);
        AnnotatedTsvWriter {
            inner,
            field_columns,
            with_hom_ref,
            columns,
            header_written: false,
            warned: false,
            rows_written: 0,
        }
    }

    ///
    /// Writer whose FORMAT columns come from the header's `##FORMAT` ids, expanded by
    /// the split map.
    ///
    pub fn from_header(inner: W, header: &VcfHeader, config: &AnnotationConfig) -> Self {
        let field_columns = field_column_names(&header.format_ids(), &config.split_columns);
        AnnotatedTsvWriter::new(inner, field_columns, config.drop_hom_ref)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.inner, "{}", self.columns.join("\t"))?;
        self.header_written = true;
        Ok(())
    }

    pub fn write_table(&mut self, table: &AnnotatedTable) -> io::Result<()> {
        if !self.header_written {
            if self.field_columns.is_empty() && !table.field_columns().is_empty() {
                self.field_columns = table.field_columns().to_vec();
                self.columns = output_columns(&self.field_columns, self.with_hom_ref);
            }
            self.write_header()?;
        }

        if !self.warned {
            let dropped: Vec<&str> = table
                .field_columns()
                .iter()
                .filter(|c| !self.field_columns.contains(c))
                .map(String::as_str)
                .collect();
            if !dropped.is_empty() {
                warn!(
                    "FORMAT columns not declared in the header are dropped: {}",
                    dropped.join(", ")
                );
                self.warned = true;
            }
        }

        for row in table {
            writeln!(self.inner, "{}", row.as_tsv_line(&self.columns))?;
        }
        self.rows_written += table.len();
        Ok(())
    }

    ///
    /// Flush and hand back the inner writer. The header row is written even when no
    /// table was.
    ///
    pub fn finish(mut self) -> io::Result<W> {
        if !self.header_written {
            self.write_header()?;
        }
        self.inner.flush()?;
        Ok(self.inner)
    }
}

pub trait TableWrite {
    ///
    /// Write the table to disk as a tab separated file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_tsv<T: AsRef<Path>>(&self, path: T) -> io::Result<()>;

    ///
    /// Write the table to disk as a gzip compressed tab separated file
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    fn write_tsv_gz<T: AsRef<Path>>(&self, path: T) -> io::Result<()>;
}

impl TableWrite for AnnotatedTable {
    fn write_tsv<T: AsRef<Path>>(&self, path: T) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let mut writer = AnnotatedTsvWriter::new(
            BufWriter::new(file),
            self.field_columns().to_vec(),
            self.has_hom_ref_counts(),
        );
        writer.write_table(self)?;
        writer.finish()?;
        Ok(())
    }

    fn write_tsv_gz<T: AsRef<Path>>(&self, path: T) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        let encoder = GzEncoder::new(BufWriter::new(file), Compression::best());
        let mut writer = AnnotatedTsvWriter::new(
            encoder,
            self.field_columns().to_vec(),
            self.has_hom_ref_counts(),
        );
        writer.write_table(self)?;
        writer.finish()?.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Read;

    use flate2::read::MultiGzDecoder;
    use pretty_assertions::assert_eq;
    use rstest::*;

    use vcfmelt_annotate::annotate_chunk;
    use vcfmelt_core::{RawChunk, RawChunkRow, VariantKey};

    fn table(format: &str, genotypes: [&str; 2]) -> AnnotatedTable {
        let samples = vec!["s1".to_string(), "s2".to_string()];
        let mut chunk = RawChunk::new(samples.clone());
        chunk.push(RawChunkRow::new(
            VariantKey::new("1", 100, "A", "T"),
            format,
            genotypes,
        ));
        annotate_chunk(&chunk, &samples, &AnnotationConfig::default()).unwrap()
    }

    #[rstest]
    fn test_header_columns_and_dropped_fields() {
        let mut writer = AnnotatedTsvWriter::new(Vec::new(), vec!["DP".to_string()], true);
        writer.write_table(&table("GT:DP", ["0/1:7", "1/1:9"])).unwrap();
        writer.write_table(&table("GT:DP:GQ", ["0/1:3:50", "0/0:4:99"])).unwrap();
        assert_eq!(writer.rows_written(), 4);

        let text = String::from_utf8(writer.finish().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with("\tzygosity\tDP"));
        assert!(!lines[0].contains("GQ"));
        assert!(lines[3].ends_with("\thet-ref\t3"));
        assert!(lines.iter().skip(1).all(|l| l.split('\t').count() == 18));
    }

    #[rstest]
    fn test_columns_from_first_table() {
        let mut writer = AnnotatedTsvWriter::new(Vec::new(), Vec::new(), true);
        writer.write_table(&table("GT:GQ", ["0/1:50", "1/1:60"])).unwrap();

        assert_eq!(writer.columns().last().unwrap(), "GQ");
    }

    #[rstest]
    fn test_from_header() {
        let header = VcfHeader::from_path(Path::new("../tests/data/vcf/cohort.vcf")).unwrap();
        let config = AnnotationConfig::default().with_split_column("AD", 2);
        let writer = AnnotatedTsvWriter::from_header(Vec::new(), &header, &config);

        let tail: Vec<&str> = writer.columns().iter().rev().take(3).map(String::as_str).collect();
        assert_eq!(tail, vec!["DP", "AD_2", "AD_1"]);
        assert!(writer.columns().iter().any(|c| c == "hom_ref_counts"));
    }

    #[rstest]
    fn test_empty_output_has_header() {
        let writer = AnnotatedTsvWriter::new(Vec::new(), Vec::new(), false);
        let text = String::from_utf8(writer.finish().unwrap()).unwrap();

        assert!(text.starts_with("CHROM\tPOS"));
        assert_eq!(text.lines().count(), 1);
    }

    #[rstest]
    fn test_write_tsv_and_gz() {
        let table = table("GT:DP", ["0/1:7", "1|1:9"]);
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("out/annotated.tsv");
        let gz = dir.path().join("out/annotated.tsv.gz");

        table.write_tsv(&plain).unwrap();
        table.write_tsv_gz(&gz).unwrap();

        let plain_text = std::fs::read_to_string(&plain).unwrap();
        let mut gz_text = String::new();
        MultiGzDecoder::new(File::open(&gz).unwrap())
            .read_to_string(&mut gz_text)
            .unwrap();

        assert_eq!(plain_text, table.to_tsv_string());
        assert_eq!(gz_text, plain_text);
    }
}
