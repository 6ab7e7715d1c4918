use std::convert::Infallible;
use std::str::FromStr;

use crate::consts::REQUIRED_COLUMNS;
use crate::errors::SelectionError;

///
/// Which samples of a VCF should be read and annotated.
///
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SampleSelection {
    #[default]
    All,
    Ids(Vec<String>),
}

impl SampleSelection {
    ///
    /// Resolve the selection against the sample ids available in a header.
    ///
    /// Requested ids keep the caller's order; repeated ids are only kept once.
    ///
    pub fn resolve(&self, available: &[String]) -> Result<Vec<String>, SelectionError> {
        let resolved = match self {
            SampleSelection::All => available.to_vec(),
            SampleSelection::Ids(ids) => {
                let mut resolved: Vec<String> = Vec::with_capacity(ids.len());
                for id in ids {
                    if !available.contains(id) {
                        return Err(SelectionError::UnknownSample(id.clone()));
                    }
                    if !resolved.contains(id) {
                        resolved.push(id.clone());
                    }
                }
                resolved
            }
        };

        if resolved.is_empty() {
            return Err(SelectionError::MissingSamples);
        }

        Ok(resolved)
    }
}

impl FromStr for SampleSelection {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(SampleSelection::All),
            other => Ok(SampleSelection::Ids(
                other
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(String::from)
                    .collect(),
            )),
        }
    }
}

///
/// Strip the leading `#` of the `#CHROM` column.
///
pub fn normalize_column_name(column: &str) -> &str {
    column.trim_start_matches('#')
}

///
/// Check that a column selection holds every column the annotation engine requires.
///
/// An empty selection stands for "all fixed columns" and is always accepted.
///
pub fn check_required_columns<S: AsRef<str>>(columns: &[S]) -> Result<(), SelectionError> {
    if columns.is_empty() {
        return Ok(());
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| {
            !columns
                .iter()
                .any(|c| normalize_column_name(c.as_ref()) == **required)
        })
        .map(|required| required.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SelectionError::MissingColumns(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn header_samples() -> Vec<String> {
        vec!["NA1".to_string(), "NA2".to_string(), "NA3".to_string()]
    }

    #[rstest]
    fn test_resolve_all(header_samples: Vec<String>) {
        let resolved = SampleSelection::All.resolve(&header_samples).unwrap();
        assert_eq!(resolved, header_samples);
    }

    #[rstest]
    fn test_resolve_ids_keeps_order_and_drops_repeats(header_samples: Vec<String>) {
        let selection: SampleSelection = "NA3,NA1,NA3".parse().unwrap();
        let resolved = selection.resolve(&header_samples).unwrap();
        assert_eq!(resolved, vec!["NA3".to_string(), "NA1".to_string()]);
    }

    #[rstest]
    fn test_resolve_unknown_sample(header_samples: Vec<String>) {
        let selection = SampleSelection::Ids(vec!["NA9".to_string()]);
        assert_eq!(
            selection.resolve(&header_samples),
            Err(SelectionError::UnknownSample("NA9".to_string()))
        );
    }

    #[rstest]
    #[case(SampleSelection::Ids(vec![]), vec!["NA1".to_string()])]
    #[case(SampleSelection::All, vec![])]
    fn test_resolve_empty(#[case] selection: SampleSelection, #[case] available: Vec<String>) {
        assert_eq!(
            selection.resolve(&available),
            Err(SelectionError::MissingSamples)
        );
    }

    #[rstest]
    fn test_required_columns_accepts_hash_prefix() {
        let columns = ["#CHROM", "POS", "REF", "ALT", "FORMAT", "INFO"];
        assert!(check_required_columns(&columns).is_ok());
        assert!(check_required_columns::<&str>(&[]).is_ok());
    }

    #[rstest]
    fn test_required_columns_reports_missing() {
        let columns = ["CHROM", "POS", "REF"];
        assert_eq!(
            check_required_columns(&columns),
            Err(SelectionError::MissingColumns(vec![
                "ALT".to_string(),
                "FORMAT".to_string()
            ]))
        );
    }
}
