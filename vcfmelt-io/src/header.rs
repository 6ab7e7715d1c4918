use std::io::BufRead;
use std::path::Path;

use vcfmelt_core::consts::SAMPLE_COLUMN_OFFSET;
use vcfmelt_core::normalize_column_name;
use vcfmelt_core::utils::{Compression, get_dynamic_reader};

use crate::error::{Result, VcfReadError};

/// The `#CHROM` line must have at least CHROM..INFO.
const MIN_HEADER_COLUMNS: usize = 8;

///
/// A single `##key=value` metadata line.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEntry {
    pub key: String,
    pub value: String,
}

impl MetaEntry {
    fn parse(line: &str) -> Self {
        let line = line.trim_start_matches("##");
        match line.split_once('=') {
            Some((key, value)) => MetaEntry {
                key: key.to_string(),
                value: value.to_string(),
            },
            None => MetaEntry {
                key: line.to_string(),
                value: String::new(),
            },
        }
    }

    ///
    /// The `ID=` attribute of a structured entry such as `<ID=GT,Number=1,...>`.
    ///
    pub fn id(&self) -> Option<&str> {
        self.value
            .strip_prefix('<')?
            .trim_end_matches('>')
            .split(',')
            .find_map(|attr| attr.strip_prefix("ID="))
    }
}

///
/// Everything in a VCF before the first data line.
///
#[derive(Debug, Clone, PartialEq)]
pub struct VcfHeader {
    meta: Vec<MetaEntry>,
    columns: Vec<String>,
    compression: Compression,
    header_lines: usize,
}

impl VcfHeader {
    ///
    /// Read the header of a plain or gzip compressed VCF file.
    ///
    /// # Arguments
    /// - path: path to the VCF file
    ///
    pub fn from_path(path: &Path) -> Result<Self> {
        let (mut reader, compression) =
            get_dynamic_reader(path).map_err(|source| VcfReadError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        VcfHeader::read_from(&mut reader, compression)
    }

    ///
    /// Consume header lines from a stream, stopping right after the `#CHROM` line.
    ///
    pub fn read_from<R: BufRead>(reader: &mut R, compression: Compression) -> Result<Self> {
        let mut meta = Vec::new();
        let mut header_lines = 0;
        let mut line_buf = String::new();

        loop {
            line_buf.clear();
            if reader.read_line(&mut line_buf)? == 0 {
                return Err(VcfReadError::HeaderNotFound);
            }
            header_lines += 1;

            let line = line_buf.trim_end_matches(['\n', '\r']);
            if line.starts_with("##") {
                meta.push(MetaEntry::parse(line));
            } else if line.starts_with('#') {
                let columns: Vec<String> = line
                    .split('\t')
                    .map(|c| normalize_column_name(c).to_string())
                    .collect();
                if columns.len() < MIN_HEADER_COLUMNS {
                    return Err(VcfReadError::InvalidColumnHeader(line.to_string()));
                }
                return Ok(VcfHeader {
                    meta,
                    columns,
                    compression,
                    header_lines,
                });
            } else if !line.trim().is_empty() {
                return Err(VcfReadError::HeaderNotFound);
            }
        }
    }

    pub fn meta(&self) -> &[MetaEntry] {
        &self.meta
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.meta
            .iter()
            .filter(|e| e.key == key)
            .map(|e| e.value.as_str())
            .collect()
    }

    /// Column names of the `#CHROM` line, with the `#` stripped.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        let column = normalize_column_name(column);
        self.columns.iter().position(|c| c == column)
    }

    pub fn samples(&self) -> &[String] {
        self.columns.get(SAMPLE_COLUMN_OFFSET..).unwrap_or(&[])
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Number of lines consumed, including the `#CHROM` line.
    pub fn header_lines(&self) -> usize {
        self.header_lines
    }

    /// FORMAT ids declared in `##FORMAT` lines, in declaration order.
    pub fn format_ids(&self) -> Vec<&str> {
        self.meta
            .iter()
            .filter(|e| e.key == "FORMAT")
            .filter_map(MetaEntry::id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn path_to_vcf() -> PathBuf {
        PathBuf::from("../tests/data/vcf/cohort.vcf")
    }

    #[fixture]
    fn path_to_vcf_gz() -> PathBuf {
        PathBuf::from("../tests/data/vcf/cohort.vcf.gz")
    }

    #[rstest]
    fn test_from_path(path_to_vcf: PathBuf) {
        let header = VcfHeader::from_path(&path_to_vcf).unwrap();

        assert_eq!(header.get("fileformat"), Some("VCFv4.2"));
        assert_eq!(header.samples(), &["S1", "S2", "S3"]);
        assert_eq!(header.columns()[0], "CHROM");
        assert_eq!(header.column_index("#CHROM"), Some(0));
        assert_eq!(header.compression(), Compression::Plain);
        assert_eq!(header.header_lines(), 8);
        assert_eq!(header.format_ids(), vec!["GT", "AD", "DP"]);
        assert_eq!(header.get_all("FORMAT").len(), 3);
    }

    #[rstest]
    fn test_from_path_gz(path_to_vcf: PathBuf, path_to_vcf_gz: PathBuf) {
        let plain = VcfHeader::from_path(&path_to_vcf).unwrap();
        let gz = VcfHeader::from_path(&path_to_vcf_gz).unwrap();

        assert_eq!(gz.compression(), Compression::Gzip);
        assert_eq!(gz.columns(), plain.columns());
        assert_eq!(gz.meta(), plain.meta());
    }

    #[rstest]
    fn test_meta_entry_without_value() {
        let text = "##fileformat=VCFv4.2\n##flag\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";
        let header = VcfHeader::read_from(&mut Cursor::new(text), Compression::Plain).unwrap();

        assert_eq!(header.get("flag"), Some(""));
        assert!(header.samples().is_empty());
    }

    #[rstest]
    #[case("##fileformat=VCFv4.2\n")]
    #[case("##fileformat=VCFv4.2\n1\t100\t.\tA\tT\t.\t.\t.\n")]
    fn test_header_not_found(#[case] text: &str) {
        let result = VcfHeader::read_from(&mut Cursor::new(text), Compression::Plain);
        assert!(matches!(result, Err(VcfReadError::HeaderNotFound)));
    }

    #[rstest]
    fn test_short_column_header() {
        let text = "#CHROM\tPOS\tREF\tALT\n";
        let result = VcfHeader::read_from(&mut Cursor::new(text), Compression::Plain);
        assert!(matches!(result, Err(VcfReadError::InvalidColumnHeader(_))));
    }

    #[rstest]
    fn test_missing_file() {
        let result = VcfHeader::from_path(Path::new("../tests/data/vcf/missing.vcf"));
        assert!(matches!(result, Err(VcfReadError::Open { .. })));
    }
}
