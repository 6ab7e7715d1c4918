use vcfmelt_core::RawChunk;

use crate::annotate::{annotate_chunk, resolve_sample_indices};
use crate::config::AnnotationConfig;
use crate::error::Result;
use crate::table::AnnotatedTable;

///
/// The working table of a chunk: the raw rows, or the annotated rows once an
/// `inplace` annotation has replaced them.
///
#[derive(Debug, Clone)]
pub enum WorkingTable {
    Raw(RawChunk),
    Annotated(AnnotatedTable),
}

///
/// One chunk of a VCF together with the samples selected for annotation.
///
/// A `VcfChunk` is created per chunk and never carries state over to the next one.
///
#[derive(Debug, Clone)]
pub struct VcfChunk {
    samples: Vec<String>,
    table: WorkingTable,
    annotations: Option<AnnotatedTable>,
}

impl VcfChunk {
    ///
    /// Wrap a raw chunk, annotating every sample it carries.
    ///
    pub fn new(raw: RawChunk) -> Result<Self> {
        let samples = raw.samples.clone();
        Self::with_samples(raw, samples)
    }

    ///
    /// Wrap a raw chunk, annotating only `samples`.
    ///
    pub fn with_samples(raw: RawChunk, samples: Vec<String>) -> Result<Self> {
        resolve_sample_indices(&raw, &samples)?;
        Ok(VcfChunk {
            samples,
            table: WorkingTable::Raw(raw),
            annotations: None,
        })
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn table(&self) -> &WorkingTable {
        &self.table
    }

    pub fn raw(&self) -> Option<&RawChunk> {
        match &self.table {
            WorkingTable::Raw(raw) => Some(raw),
            WorkingTable::Annotated(_) => None,
        }
    }

    /// Annotations stored alongside the raw table (`inplace = false`).
    pub fn annotations(&self) -> Option<&AnnotatedTable> {
        self.annotations.as_ref()
    }

    /// The annotated table, wherever it is stored.
    pub fn annotated(&self) -> Option<&AnnotatedTable> {
        match &self.table {
            WorkingTable::Annotated(table) => Some(table),
            WorkingTable::Raw(_) => self.annotations.as_ref(),
        }
    }

    pub fn into_annotated(self) -> Option<AnnotatedTable> {
        match self.table {
            WorkingTable::Annotated(table) => Some(table),
            WorkingTable::Raw(_) => self.annotations,
        }
    }

    ///
    /// Annotate the chunk.
    ///
    /// With `inplace` the raw table is replaced by the annotated one; otherwise the
    /// annotated table is stored next to it and any previous annotations are
    /// overwritten. Once the raw table has been replaced, further calls leave the
    /// chunk unchanged.
    ///
    pub fn add_variant_annotations(&mut self, config: &AnnotationConfig) -> Result<()> {
        let WorkingTable::Raw(raw) = &self.table else {
            return Ok(());
        };

        let annotated = annotate_chunk(raw, &self.samples, config)?;
        if config.inplace {
            self.table = WorkingTable::Annotated(annotated);
            self.annotations = None;
        } else {
            self.annotations = Some(annotated);
        }

        Ok(())
    }
}
