use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnnotationError, Result};

///
/// Options recognized by the annotation step.
///
/// - `split_columns`: FORMAT id -> number of comma separated values it must split into,
///   e.g. `{AD = 2}` yields `AD_1` and `AD_2`.
/// - `inplace`: replace the working table with the annotated one instead of storing it
///   alongside the raw chunk.
/// - `drop_hom_ref`: count `0/0` and `0|0` calls per variant and drop them before decoding.
///
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct AnnotationConfig {
    pub split_columns: BTreeMap<String, usize>,
    pub inplace: bool,
    pub drop_hom_ref: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        AnnotationConfig {
            split_columns: BTreeMap::new(),
            inplace: false,
            drop_hom_ref: true,
        }
    }
}

impl AnnotationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_split_column(mut self, field: impl Into<String>, arity: usize) -> Self {
        self.split_columns.insert(field.into(), arity);
        self
    }

    pub fn with_inplace(mut self, inplace: bool) -> Self {
        self.inplace = inplace;
        self
    }

    pub fn with_drop_hom_ref(mut self, drop_hom_ref: bool) -> Self {
        self.drop_hom_ref = drop_hom_ref;
        self
    }

    pub fn split_arity(&self, field: &str) -> Option<usize> {
        self.split_columns.get(field).copied()
    }

    pub fn validate(&self) -> Result<()> {
        match self.split_columns.iter().find(|(_, arity)| **arity == 0) {
            Some((field, _)) => Err(AnnotationError::InvalidSplitArity(field.clone())),
            None => Ok(()),
        }
    }
}

impl TryFrom<&Path> for AnnotationConfig {
    type Error = AnnotationError;

    ///
    /// Load an annotation config from a `.toml` file. Missing keys take their defaults.
    ///
    fn try_from(path: &Path) -> Result<Self> {
        let toml_str = read_to_string(path)?;
        let config: AnnotationConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

///
/// One `FIELD:COUNT` entry of a split map, as given on the command line.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSpec {
    pub field: String,
    pub arity: usize,
}

impl FromStr for SplitSpec {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self> {
        let (field, arity) = s
            .split_once(':')
            .ok_or_else(|| AnnotationError::InvalidSplitSpec(s.to_string()))?;
        let arity: usize = arity
            .trim()
            .parse()
            .map_err(|_| AnnotationError::InvalidSplitSpec(s.to_string()))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(AnnotationError::InvalidSplitSpec(s.to_string()));
        }
        if arity == 0 {
            return Err(AnnotationError::InvalidSplitArity(field.to_string()));
        }
        Ok(SplitSpec {
            field: field.to_string(),
            arity,
        })
    }
}
