use std::io;
use std::path::PathBuf;

use thiserror::Error;

use vcfmelt_core::SelectionError;

/// Error type for reading VCF files.
#[derive(Error, Debug)]
pub enum VcfReadError {
    /// IO error while reading an already opened stream.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The file could not be opened.
    #[error("Failed to open VCF {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The stream ended, or data started, before the `#CHROM` line.
    #[error("No #CHROM column header line found")]
    HeaderNotFound,

    /// The `#CHROM` line does not carry the fixed VCF columns.
    #[error("Invalid column header line: {0}")]
    InvalidColumnHeader(String),

    /// A data line could not be parsed.
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Chunk size must be at least 1")]
    InvalidChunksize,

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Result type alias for vcfmelt-io operations.
pub type Result<T> = std::result::Result<T, VcfReadError>;
