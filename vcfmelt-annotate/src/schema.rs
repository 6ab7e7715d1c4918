use std::collections::BTreeMap;

use vcfmelt_core::VariantKey;
use vcfmelt_core::consts::MISSING_VALUE;

use crate::error::{AnnotationError, Result};

pub const GT_FIELD: &str = "GT";

#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldSlot {
    Genotype,
    Single { column: usize },
    Split { first_column: usize, arity: usize },
}

///
/// Decode schema for one distinct FORMAT string.
///
/// Built once per FORMAT group and shared by every row decoded with it. Each
/// FORMAT field other than `GT` maps to one output column, or to `arity`
/// columns named `FIELD_1..FIELD_n` when the field is listed in the split map.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSchema {
    format: String,
    fields: Vec<String>,
    slots: Vec<FieldSlot>,
    columns: Vec<String>,
}

///
/// A sample string split according to its schema.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSample<'a> {
    pub gt: Option<&'a str>,
    pub values: Vec<Option<String>>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != MISSING_VALUE)
}

impl FormatSchema {
    pub fn new(format: &str, split_columns: &BTreeMap<String, usize>) -> Self {
        let fields: Vec<String> = format.split(':').map(String::from).collect();
        let mut slots = Vec::with_capacity(fields.len());
        let mut columns = Vec::new();

        for field in &fields {
            if field == GT_FIELD {
                slots.push(FieldSlot::Genotype);
                continue;
            }
            match split_columns.get(field) {
                Some(&arity) => {
                    slots.push(FieldSlot::Split {
                        first_column: columns.len(),
                        arity,
                    });
                    columns.extend((1..=arity).map(|i| format!("{field}_{i}")));
                }
                None => {
                    slots.push(FieldSlot::Single {
                        column: columns.len(),
                    });
                    columns.push(field.clone());
                }
            }
        }

        FormatSchema {
            format: format.to_string(),
            fields,
            slots,
            columns,
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn gt_index(&self) -> Option<usize> {
        self.slots.iter().position(|s| *s == FieldSlot::Genotype)
    }

    /// Output columns produced by the non-GT fields, in FORMAT order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    ///
    /// Split one sample's genotype string positionally against this schema.
    ///
    /// Missing markers (`.`) and absent trailing fields become `None`. A split field whose
    /// value does not break into exactly `arity` comma separated values is an error.
    ///
    pub fn parse_sample<'a>(
        &self,
        key: &VariantKey,
        sample_id: &str,
        genotype: Option<&'a str>,
    ) -> Result<ParsedSample<'a>> {
        let mut parsed = ParsedSample {
            gt: None,
            values: vec![None; self.columns.len()],
        };

        let Some(genotype) = genotype else {
            return Ok(parsed);
        };

        let mut raw_values = genotype.split(':');
        for (field, slot) in self.fields.iter().zip(&self.slots) {
            let raw = raw_values.next();
            match *slot {
                FieldSlot::Genotype => parsed.gt = raw,
                FieldSlot::Single { column } => {
                    parsed.values[column] = present(raw).map(String::from);
                }
                FieldSlot::Split {
                    first_column,
                    arity,
                } => {
                    let Some(raw) = present(raw) else {
                        continue;
                    };
                    let parts: Vec<&str> = raw.split(',').collect();
                    if parts.len() != arity {
                        return Err(AnnotationError::SplitCountMismatch {
                            field: field.clone(),
                            sample: sample_id.to_string(),
                            key: key.clone(),
                            expected: arity,
                            found: parts.len(),
                            value: raw.to_string(),
                        });
                    }
                    for (offset, part) in parts.into_iter().enumerate() {
                        parsed.values[first_column + offset] = present(Some(part)).map(String::from);
                    }
                }
            }
        }

        Ok(parsed)
    }
}

///
/// Output column names for a list of FORMAT ids (e.g. from `##FORMAT` header lines).
///
pub fn field_column_names<S: AsRef<str>>(
    fields: &[S],
    split_columns: &BTreeMap<String, usize>,
) -> Vec<String> {
    let format = fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(":");
    if format.is_empty() {
        return Vec::new();
    }
    FormatSchema::new(&format, split_columns).columns
}
