use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use log::{debug, info};

use vcfmelt_core::consts::{DEFAULT_CHUNKSIZE, FIXED_COLUMNS, REQUIRED_COLUMNS};
use vcfmelt_core::utils::get_dynamic_reader_w_stdin;
use vcfmelt_core::{
    RawChunk, RawChunkRow, SampleSelection, SelectionError, VariantKey, check_required_columns,
    normalize_column_name,
};

use crate::error::{Result, VcfReadError};
use crate::header::VcfHeader;

///
/// What to read from a VCF and how much at a time.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderOptions {
    pub samples: SampleSelection,
    /// Fixed columns to load. Empty means every fixed column present in the file.
    pub columns: Vec<String>,
    pub chunksize: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            samples: SampleSelection::All,
            columns: Vec::new(),
            chunksize: DEFAULT_CHUNKSIZE,
        }
    }
}

impl ReaderOptions {
    pub fn with_samples(mut self, samples: SampleSelection) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_chunksize(mut self, chunksize: usize) -> Self {
        self.chunksize = chunksize;
        self
    }
}

/// Column positions of the fields every row needs.
#[derive(Debug, Clone, Copy)]
struct KeyPositions {
    chrom: usize,
    pos: usize,
    ref_allele: usize,
    alt: usize,
    format: usize,
}

impl KeyPositions {
    fn from_header(header: &VcfHeader) -> Result<Self> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| header.column_index(c).is_none())
            .map(|c| c.to_string())
            .collect();
        let index = |c: &str| header.column_index(c).unwrap_or_default();

        if !missing.is_empty() {
            return Err(SelectionError::MissingColumns(missing).into());
        }

        Ok(KeyPositions {
            chrom: index("CHROM"),
            pos: index("POS"),
            ref_allele: index("REF"),
            alt: index("ALT"),
            format: index("FORMAT"),
        })
    }
}

///
/// Streams a VCF as [`RawChunk`]s of at most `chunksize` data rows.
///
pub struct VcfReader {
    path: PathBuf,
    header: VcfHeader,
    reader: BufReader<Box<dyn Read>>,
    samples: Vec<String>,
    sample_positions: Vec<usize>,
    extra_columns: Vec<String>,
    extra_positions: Vec<usize>,
    key_positions: KeyPositions,
    chunksize: usize,
    line_number: usize,
    chunk_index: usize,
    exhausted: bool,
    line_buf: String,
}

impl VcfReader {
    ///
    /// Open a VCF file (or `-` for stdin) and resolve the sample and column selection
    /// against its header.
    ///
    /// # Arguments
    /// - path: path to a plain or gzip compressed VCF
    /// - options: sample selection, column selection and chunk size
    ///
    pub fn open<P: AsRef<Path>>(path: P, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        let (mut reader, compression) = get_dynamic_reader_w_stdin(&path.to_string_lossy())
            .map_err(|source| VcfReadError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        let header = VcfHeader::read_from(&mut reader, compression)?;

        if options.chunksize == 0 {
            return Err(VcfReadError::InvalidChunksize);
        }

        let samples = options.samples.resolve(header.samples())?;
        let sample_positions = samples
            .iter()
            .map(|s| {
                header
                    .column_index(s)
                    .ok_or_else(|| SelectionError::UnknownSample(s.clone()))
            })
            .collect::<std::result::Result<Vec<usize>, SelectionError>>()?;

        check_required_columns(options.columns.as_slice())?;
        let key_positions = KeyPositions::from_header(&header)?;
        let extra_columns = select_extra_columns(&header, &options.columns)?;
        let extra_positions = extra_columns
            .iter()
            .filter_map(|c| header.column_index(c))
            .collect();

        info!(
            "Opened {} ({:?}): {} of {} samples selected, chunks of {} rows",
            path.display(),
            compression,
            samples.len(),
            header.samples().len(),
            options.chunksize
        );

        Ok(VcfReader {
            path: path.to_path_buf(),
            line_number: header.header_lines(),
            header,
            reader,
            samples,
            sample_positions,
            extra_columns,
            extra_positions,
            key_positions,
            chunksize: options.chunksize,
            chunk_index: 0,
            exhausted: false,
            line_buf: String::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &VcfHeader {
        &self.header
    }

    /// The resolved sample selection, in output order.
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    ///
    /// Read the next chunk. Identical rows within the chunk are removed, keeping the
    /// first. Returns `Ok(None)` once the data is exhausted.
    ///
    pub fn next_chunk(&mut self) -> Result<Option<RawChunk>> {
        if self.exhausted {
            return Ok(None);
        }

        let mut chunk = RawChunk::new(self.samples.clone())
            .with_extra_columns(self.extra_columns.clone())
            .with_index(self.chunk_index);

        while chunk.len() < self.chunksize {
            self.line_buf.clear();
            if self.reader.read_line(&mut self.line_buf)? == 0 {
                self.exhausted = true;
                break;
            }
            self.line_number += 1;

            let line = self.line_buf.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }
            chunk.push(self.parse_row(line)?);
        }

        if chunk.is_empty() {
            return Ok(None);
        }

        let duplicates = chunk.dedup();
        if duplicates > 0 {
            debug!(
                "chunk {}: dropped {} duplicate rows",
                self.chunk_index, duplicates
            );
        }
        self.chunk_index += 1;

        Ok(Some(chunk))
    }

    fn malformed(&self, reason: String) -> VcfReadError {
        VcfReadError::MalformedRecord {
            line: self.line_number,
            reason,
        }
    }

    fn parse_row(&self, line: &str) -> Result<RawChunkRow> {
        let fields: Vec<&str> = line.split('\t').collect();
        let expected = self.header.columns().len();
        if fields.len() < expected {
            return Err(self.malformed(format!(
                "expected {} tab separated fields, found {}",
                expected,
                fields.len()
            )));
        }

        let p = &self.key_positions;
        let pos = fields[p.pos]
            .parse::<u64>()
            .map_err(|_| self.malformed(format!("invalid POS {:?}", fields[p.pos])))?;

        let key = VariantKey::new(fields[p.chrom], pos, fields[p.ref_allele], fields[p.alt]);
        let genotypes = self.sample_positions.iter().map(|&i| fields[i]);
        let extra = self
            .extra_positions
            .iter()
            .map(|&i| fields[i].to_string())
            .collect();

        Ok(RawChunkRow::new(key, fields[p.format], genotypes).with_extra(extra))
    }
}

impl Iterator for VcfReader {
    type Item = Result<RawChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_chunk() {
            Ok(chunk) => chunk.map(Ok),
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

///
/// Non-key fixed columns to carry along: ID, QUAL, FILTER and INFO unless the
/// selection names a subset.
///
fn select_extra_columns(header: &VcfHeader, selection: &[String]) -> Result<Vec<String>> {
    let is_extra = |c: &str| !REQUIRED_COLUMNS.contains(&c);

    if selection.is_empty() {
        return Ok(FIXED_COLUMNS
            .iter()
            .filter(|c| is_extra(**c) && header.column_index(c).is_some())
            .map(|c| c.to_string())
            .collect());
    }

    let mut extra: Vec<String> = Vec::new();
    for column in selection {
        let column = normalize_column_name(column);
        if !FIXED_COLUMNS.contains(&column) || header.column_index(column).is_none() {
            return Err(SelectionError::UnknownColumn(column.to_string()).into());
        }
        if is_extra(column) && !extra.iter().any(|c| c == column) {
            extra.push(column.to_string());
        }
    }
    Ok(extra)
}
