use thiserror::Error;

use vcfmelt_core::{SelectionError, VariantKey};

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(
        "FORMAT field {field} of sample {sample} at {key} should split into {expected} values, found {found}: {value:?}"
    )]
    SplitCountMismatch {
        field: String,
        sample: String,
        key: VariantKey,
        expected: usize,
        found: usize,
        value: String,
    },
    #[error("Split arity for FORMAT field {0} must be at least 1")]
    InvalidSplitArity(String),
    #[error("Invalid split column specification {0:?}, expected FIELD:COUNT (e.g. AD:2)")]
    InvalidSplitSpec(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, AnnotationError>;
