//! # Reading and writing for vcfmelt.
//!
//! [`VcfHeader`] parses the metadata and column header of a VCF, [`VcfReader`] streams
//! the data lines as [`RawChunk`](vcfmelt_core::RawChunk)s ready for annotation, and
//! [`AnnotatedTsvWriter`] writes the annotated long-form tables back out. Plain and
//! gzip/bgzf compressed inputs are both supported.
//!
//! ```no_run
//! use vcfmelt_annotate::{AnnotationConfig, annotate_chunk};
//! use vcfmelt_io::{AnnotatedTsvWriter, ReaderOptions, VcfReader};
//!
//! let config = AnnotationConfig::default().with_split_column("AD", 2);
//! let reader = VcfReader::open("cohort.vcf.gz", ReaderOptions::default()).unwrap();
//! let samples = reader.samples().to_vec();
//! let mut writer = AnnotatedTsvWriter::from_header(std::io::stdout(), reader.header(), &config);
//!
//! for chunk in reader {
//!     let table = annotate_chunk(&chunk.unwrap(), &samples, &config).unwrap();
//!     writer.write_table(&table).unwrap();
//! }
//! writer.finish().unwrap();
//! ```
pub mod error;
pub mod header;
pub mod reader;
pub mod writer;

pub use error::*;
pub use header::*;
pub use reader::*;
pub use writer::*;
