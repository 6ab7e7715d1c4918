//! # vcfmelt-annotate
//!
//! Turns chunks of a multi-sample VCF into a long-form, annotated table with one row per
//! (variant, sample) pair.
//!
//! For each chunk the rows are grouped by FORMAT string, the sample columns of every group
//! are melted into long form and, by default, homozygous-reference calls (`0/0`, `0|0`) are
//! collapsed into a per-variant `hom_ref_counts` column before the remaining calls are
//! decoded. Decoding adds `multiallele`, `phase`, `a1`/`a2`, `GT1`/`GT2`,
//! `vartype1`/`vartype2` and `zygosity`, plus one column per FORMAT field (optionally split
//! into several columns, e.g. `AD_1`, `AD_2`).
//!
//! ## Example
//!
//! ```rust
//! use vcfmelt_annotate::{AnnotationConfig, Zygosity, annotate_chunk};
//! use vcfmelt_core::{RawChunk, RawChunkRow, VariantKey};
//!
//! let mut chunk = RawChunk::new(vec!["sample1".to_string()]);
//! chunk.push(RawChunkRow::new(
//!     VariantKey::new("1", 100, "A", "T"),
//!     "GT:AD",
//!     ["0/1:12,5"],
//! ));
//!
//! let config = AnnotationConfig::default().with_split_column("AD", 2);
//! let table = annotate_chunk(&chunk, &chunk.samples, &config).unwrap();
//!
//! let row = &table.rows()[0];
//! assert_eq!(row.zygosity(), Zygosity::HetRef);
//! assert_eq!(row.field("AD_2"), Some("5"));
//! ```
//!
pub mod annotate;
pub mod chunk;
pub mod config;
pub mod error;
pub mod genotype;
pub mod reshape;
pub mod schema;
pub mod table;

// re-export things
pub use annotate::*;
pub use chunk::*;
pub use config::*;
pub use error::*;
pub use genotype::*;
pub use schema::*;
pub use table::*;
