//! # vcfmelt-core
//!
//! Shared building blocks for the vcfmelt crates: the [`VariantKey`] that identifies a
//! variant record, the raw chunk tables produced by the chunk reader, sample and column
//! selection, and small helpers for opening plain or gzip-compressed VCF files.
//!
pub mod consts;
pub mod errors;
pub mod models;
pub mod selection;
pub mod utils;

// re-export for cleaner imports
pub use errors::*;
pub use models::*;
pub use selection::*;
