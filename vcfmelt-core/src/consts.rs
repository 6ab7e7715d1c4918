/// Columns the annotation engine cannot work without.
pub const REQUIRED_COLUMNS: [&str; 5] = ["CHROM", "POS", "REF", "ALT", "FORMAT"];

/// The fixed VCF columns, in file order.
pub const FIXED_COLUMNS: [&str; 9] = [
    "CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
];

/// Sample ids start at this (0-based) column of the `#CHROM` line.
pub const SAMPLE_COLUMN_OFFSET: usize = 9;

/// VCF missing value marker.
pub const MISSING_VALUE: &str = ".";

pub const DEFAULT_CHUNKSIZE: usize = 5000;

pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// 256KB buffer for large VCF files
pub const READ_CAPACITY: usize = 256 * 1024;
