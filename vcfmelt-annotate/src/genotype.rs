//! Genotype call decoding: phase, allele indices, allele bases, variant types and zygosity.
//!
//! Decoding never fails. Anything that is not a clean `i/j` (or `i|j`) call degrades to
//! missing allele fields, so one malformed sample cannot abort a whole chunk.

use std::fmt::{self, Display};

use vcfmelt_core::VariantKey;
use vcfmelt_core::consts::MISSING_VALUE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Unphased,
    Phased,
}

impl Phase {
    pub fn from_separator(separator: char) -> Option<Self> {
        match separator {
            '/' => Some(Phase::Unphased),
            '|' => Some(Phase::Phased),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Unphased => "/",
            Phase::Phased => "|",
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Snp,
    Mnp,
    Ins,
    Del,
    Indel,
    Sv,
}

impl VarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarType::Snp => "snp",
            VarType::Mnp => "mnp",
            VarType::Ins => "ins",
            VarType::Del => "del",
            VarType::Indel => "indel",
            VarType::Sv => "SV",
        }
    }
}

impl Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zygosity {
    HomRef,
    HetRef,
    AltRef,
    HetMiss,
    HomMiss,
}

impl Zygosity {
    ///
    /// Classify a call from its two allele indices, `None` meaning a missing allele.
    ///
    pub fn from_alleles(gt1: Option<usize>, gt2: Option<usize>) -> Self {
        match (gt1, gt2) {
            (None, None) => Zygosity::HomMiss,
            (None, Some(_)) | (Some(_), None) => Zygosity::HetMiss,
            (Some(0), Some(0)) => Zygosity::HomRef,
            (Some(0), Some(_)) | (Some(_), Some(0)) => Zygosity::HetRef,
            (Some(_), Some(_)) => Zygosity::AltRef,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Zygosity::HetMiss | Zygosity::HomMiss)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Zygosity::HomRef => "hom-ref",
            Zygosity::HetRef => "het-ref",
            Zygosity::AltRef => "alt-ref",
            Zygosity::HetMiss => "het-miss",
            Zygosity::HomMiss => "hom-miss",
        }
    }
}

impl Display for Zygosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// The raw content of a GT value: separator and the two allele indices.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenotypeCall {
    pub phase: Option<Phase>,
    pub gt1: Option<usize>,
    pub gt2: Option<usize>,
}

fn parse_allele_index(token: &str) -> Option<usize> {
    if token == MISSING_VALUE {
        return None;
    }
    token.parse().ok()
}

impl GenotypeCall {
    ///
    /// Split a GT value on its first `/` or `|`.
    ///
    /// `None`, `.` and values without a separator yield an empty call; an allele token
    /// that is `.` or not an integer yields a `None` index on that side only.
    ///
    pub fn parse(token: Option<&str>) -> Self {
        let Some(token) = token else {
            return GenotypeCall::default();
        };

        let Some((at, separator)) = token.char_indices().find(|(_, c)| *c == '/' || *c == '|')
        else {
            return GenotypeCall::default();
        };

        let (left, right) = (&token[..at], &token[at + separator.len_utf8()..]);

        GenotypeCall {
            phase: Phase::from_separator(separator),
            gt1: parse_allele_index(left),
            gt2: parse_allele_index(right),
        }
    }
}

fn is_symbolic(allele: &str) -> bool {
    allele.starts_with('<') || allele.contains('[') || allele.contains(']') || allele == "*"
}

///
/// Classify one allele against REF. Returns `None` when the allele is the reference itself.
///
pub fn classify_allele(ref_allele: &str, allele: &str) -> Option<VarType> {
    if allele.eq_ignore_ascii_case(ref_allele) {
        return None;
    }
    if is_symbolic(allele) {
        return Some(VarType::Sv);
    }

    let (r, a) = (ref_allele.as_bytes(), allele.as_bytes());
    let mismatches = r
        .iter()
        .zip(a)
        .filter(|(x, y)| !x.eq_ignore_ascii_case(y))
        .count();

    let vartype = if r.len() == a.len() {
        match mismatches {
            1 => VarType::Snp,
            _ => VarType::Mnp,
        }
    } else if mismatches > 0 {
        VarType::Indel
    } else if r.len() > a.len() {
        VarType::Del
    } else {
        VarType::Ins
    };

    Some(vartype)
}

///
/// Everything derived from one sample's GT value at one variant.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedGenotype {
    pub multiallele: bool,
    pub phase: Option<Phase>,
    pub gt1: Option<usize>,
    pub gt2: Option<usize>,
    pub a1: Option<String>,
    pub a2: Option<String>,
    pub vartype1: Option<VarType>,
    pub vartype2: Option<VarType>,
    pub zygosity: Zygosity,
}

///
/// Decode a GT value against its variant.
///
/// Allele indices pointing past the last ALT allele are treated as missing.
///
pub fn decode_genotype(key: &VariantKey, gt: Option<&str>) -> DecodedGenotype {
    let call = GenotypeCall::parse(gt);

    let resolve = |index: Option<usize>| -> (Option<usize>, Option<String>) {
        match index.and_then(|i| key.allele(i).map(|bases| (i, bases))) {
            Some((i, bases)) => (Some(i), Some(bases.to_string())),
            None => (None, None),
        }
    };
    let (gt1, a1) = resolve(call.gt1);
    let (gt2, a2) = resolve(call.gt2);

    let vartype1 = a1
        .as_deref()
        .and_then(|a| classify_allele(&key.ref_allele, a));
    let vartype2 = a2
        .as_deref()
        .and_then(|a| classify_allele(&key.ref_allele, a));

    DecodedGenotype {
        multiallele: key.is_multiallelic(),
        phase: call.phase,
        gt1,
        gt2,
        a1,
        a2,
        vartype1,
        vartype2,
        zygosity: Zygosity::from_alleles(gt1, gt2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(Some("0/1"), Some(Phase::Unphased), Some(0), Some(1))]
    #[case(Some("1|0"), Some(Phase::Phased), Some(1), Some(0))]
    #[case(Some("./."), Some(Phase::Unphased), None, None)]
    #[case(Some(".|1"), Some(Phase::Phased), None, Some(1))]
    #[case(Some("."), None, None, None)]
    #[case(None, None, None, None)]
    #[case(Some("1"), None, None, None)]
    #[case(Some("0/x"), Some(Phase::Unphased), Some(0), None)]
    #[case(Some("12/3"), Some(Phase::Unphased), Some(12), Some(3))]
    fn test_parse_call(
        #[case] token: Option<&str>,
        #[case] phase: Option<Phase>,
        #[case] gt1: Option<usize>,
        #[case] gt2: Option<usize>,
    ) {
        let call = GenotypeCall::parse(token);
        assert_eq!(call, GenotypeCall { phase, gt1, gt2 });
    }

    #[rstest]
    #[case("A", "A", None)]
    #[case("A", "a", None)]
    #[case("A", "T", Some(VarType::Snp))]
    #[case("AC", "AT", Some(VarType::Snp))]
    #[case("AC", "GT", Some(VarType::Mnp))]
    #[case("A", "AT", Some(VarType::Ins))]
    #[case("AT", "A", Some(VarType::Del))]
    #[case("AT", "G", Some(VarType::Indel))]
    #[case("A", "GTT", Some(VarType::Indel))]
    #[case("A", "<DEL>", Some(VarType::Sv))]
    #[case("G", "G]17:198982]", Some(VarType::Sv))]
    #[case("A", "*", Some(VarType::Sv))]
    fn test_classify_allele(
        #[case] ref_allele: &str,
        #[case] allele: &str,
        #[case] expected: Option<VarType>,
    ) {
        assert_eq!(classify_allele(ref_allele, allele), expected);
    }

    #[rstest]
    #[case(Some(0), Some(0), Zygosity::HomRef)]
    #[case(Some(0), Some(1), Zygosity::HetRef)]
    #[case(Some(2), Some(0), Zygosity::HetRef)]
    #[case(Some(1), Some(1), Zygosity::AltRef)]
    #[case(Some(1), Some(2), Zygosity::AltRef)]
    #[case(None, Some(1), Zygosity::HetMiss)]
    #[case(Some(0), None, Zygosity::HetMiss)]
    #[case(None, None, Zygosity::HomMiss)]
    fn test_zygosity(
        #[case] gt1: Option<usize>,
        #[case] gt2: Option<usize>,
        #[case] expected: Zygosity,
    ) {
        assert_eq!(Zygosity::from_alleles(gt1, gt2), expected);
    }

    #[rstest]
    fn test_decode_het_snp() {
        let key = VariantKey::new("1", 100, "A", "T");
        let decoded = decode_genotype(&key, Some("0/1"));

        assert_eq!(
            decoded,
            DecodedGenotype {
                multiallele: false,
                phase: Some(Phase::Unphased),
                gt1: Some(0),
                gt2: Some(1),
                a1: Some("A".to_string()),
                a2: Some("T".to_string()),
                vartype1: None,
                vartype2: Some(VarType::Snp),
                zygosity: Zygosity::HetRef,
            }
        );
    }

    #[rstest]
    fn test_decode_multiallelic() {
        let key = VariantKey::new("2", 50, "AT", "A,ATT");
        let decoded = decode_genotype(&key, Some("1|2"));

        assert_eq!(decoded.multiallele, true);
        assert_eq!(decoded.a1.as_deref(), Some("A"));
        assert_eq!(decoded.a2.as_deref(), Some("ATT"));
        assert_eq!(decoded.vartype1, Some(VarType::Del));
        assert_eq!(decoded.vartype2, Some(VarType::Ins));
        assert_eq!(decoded.zygosity, Zygosity::AltRef);
        assert_eq!(decoded.phase, Some(Phase::Phased));
    }

    #[rstest]
    fn test_decode_missing() {
        let key = VariantKey::new("1", 100, "A", "T");
        let decoded = decode_genotype(&key, None);

        assert_eq!(decoded.gt1, None);
        assert_eq!(decoded.gt2, None);
        assert_eq!(decoded.a1, None);
        assert_eq!(decoded.a2, None);
        assert_eq!(decoded.phase, None);
        assert_eq!(decoded.zygosity, Zygosity::HomMiss);
    }

    #[rstest]
    fn test_decode_index_out_of_range_is_missing() {
        let key = VariantKey::new("1", 100, "A", "T");
        let decoded = decode_genotype(&key, Some("0/3"));

        assert_eq!(decoded.gt1, Some(0));
        assert_eq!(decoded.gt2, None);
        assert_eq!(decoded.a2, None);
        assert_eq!(decoded.zygosity, Zygosity::HetMiss);
    }
}
