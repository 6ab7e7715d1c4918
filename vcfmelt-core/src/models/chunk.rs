use std::fmt::{self, Display};

use fxhash::FxHashSet;

use crate::models::VariantKey;

///
/// One data line of a VCF chunk, restricted to the selected columns.
///
/// `genotypes` holds one raw genotype string per selected sample, in the
/// same order as [`RawChunk::samples`]. `extra` holds any selected columns
/// beyond the required ones (ID, QUAL, FILTER, INFO), in the order of
/// [`RawChunk::extra_columns`].
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct RawChunkRow {
    pub key: VariantKey,
    pub format: String,
    pub extra: Vec<String>,
    pub genotypes: Vec<String>,
}

impl RawChunkRow {
    pub fn new<I, S>(key: VariantKey, format: impl Into<String>, genotypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawChunkRow {
            key,
            format: format.into(),
            extra: Vec::new(),
            genotypes: genotypes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_extra(mut self, extra: Vec<String>) -> Self {
        self.extra = extra;
        self
    }

    pub fn is_reference_only(&self) -> bool {
        self.key.is_reference_only()
    }

    pub fn genotype(&self, sample_index: usize) -> Option<&str> {
        self.genotypes.get(sample_index).map(String::as_str)
    }
}

///
/// A batch of raw VCF rows as handed out by the chunk reader.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawChunk {
    pub index: usize,
    pub samples: Vec<String>,
    pub extra_columns: Vec<String>,
    pub rows: Vec<RawChunkRow>,
}

impl RawChunk {
    pub fn new(samples: Vec<String>) -> Self {
        RawChunk {
            samples,
            ..Default::default()
        }
    }

    pub fn with_extra_columns(mut self, extra_columns: Vec<String>) -> Self {
        self.extra_columns = extra_columns;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    ///
    /// Append a row. Row width is not checked: a sample position past the end of
    /// `row.genotypes` reads as a missing call through [`RawChunkRow::genotype`].
    ///
    pub fn push(&mut self, row: RawChunkRow) {
        self.rows.push(row);
    }

    ///
    /// Remove rows whose values are identical across every selected column,
    /// keeping the first occurrence. Returns the number of rows removed.
    ///
    pub fn dedup(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: FxHashSet<RawChunkRow> = FxHashSet::default();
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    pub fn sample_index(&self, sample_id: &str) -> Option<usize> {
        self.samples.iter().position(|s| s == sample_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RawChunkRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a RawChunk {
    type Item = &'a RawChunkRow;
    type IntoIter = std::slice::Iter<'a, RawChunkRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl Display for RawChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RawChunk #{} with {} rows and {} samples.",
            self.index,
            self.len(),
            self.samples.len()
        )
    }
}
