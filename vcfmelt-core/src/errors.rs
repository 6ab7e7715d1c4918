use thiserror::Error;

/// Configuration errors raised while resolving the caller's sample and column selection.
/// These are fatal and surface at construction time.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SelectionError {
    #[error("No sample IDs selected")]
    MissingSamples,

    #[error("Sample {0} is not present in the VCF header")]
    UnknownSample(String),

    #[error("Column selection is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Column {0} is not present in the VCF header")]
    UnknownColumn(String),
}
