use std::fmt::{self, Display};

use crate::consts::MISSING_VALUE;

///
/// VariantKey struct, identifies one variant record inside a chunk.
///
/// Keys are not unique across chunks; a record split over a chunk boundary
/// yields the same key twice.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
pub struct VariantKey {
    pub chrom: String,
    pub pos: u64,
    pub ref_allele: String,
    pub alt: String,
}

impl VariantKey {
    pub fn new(
        chrom: impl Into<String>,
        pos: u64,
        ref_allele: impl Into<String>,
        alt: impl Into<String>,
    ) -> Self {
        VariantKey {
            chrom: chrom.into(),
            pos,
            ref_allele: ref_allele.into(),
            alt: alt.into(),
        }
    }

    ///
    /// True for no-call / reference-only sites (`ALT == "."`).
    ///
    pub fn is_reference_only(&self) -> bool {
        self.alt == MISSING_VALUE
    }

    ///
    /// True when ALT lists more than one alternate allele.
    ///
    pub fn is_multiallelic(&self) -> bool {
        self.alt.contains(',')
    }

    pub fn alt_alleles(&self) -> impl Iterator<Item = &str> {
        self.alt.split(',')
    }

    ///
    /// Look up allele bases by genotype index, `0` being REF and `1..` indexing into ALT.
    ///
    pub fn allele(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(self.ref_allele.as_str()),
            i => self.alt_alleles().nth(i - 1),
        }
    }

    ///
    /// Get the tab separated `CHROM POS REF ALT` string of the key
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.chrom, self.pos, self.ref_allele, self.alt
        )
    }
}

impl Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {}>{}",
            self.chrom, self.pos, self.ref_allele, self.alt
        )
    }
}
