use std::fmt::{self, Display};
use std::sync::Arc;

use fxhash::FxHashMap;

use vcfmelt_core::VariantKey;

use crate::genotype::{DecodedGenotype, Phase, VarType, Zygosity};
use crate::schema::FormatSchema;

#[cfg(feature = "dataframe")]
use polars::prelude::*;
#[cfg(feature = "dataframe")]
use std::io::Cursor;

pub const KEY_COLUMNS: [&str; 7] = [
    "CHROM",
    "POS",
    "REF",
    "ALT",
    "sample_ids",
    "sample_genotypes",
    "FORMAT",
];

pub const HOM_REF_COLUMN: &str = "hom_ref_counts";

pub const ANNOTATION_COLUMNS: [&str; 9] = [
    "multiallele",
    "phase",
    "a1",
    "a2",
    "GT1",
    "GT2",
    "vartype1",
    "vartype2",
    "zygosity",
];

///
/// One annotated (variant, sample) pair.
///
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRow {
    pub key: VariantKey,
    pub sample_id: String,
    pub sample_genotype: Option<String>,
    pub schema: Arc<FormatSchema>,
    pub hom_ref_count: Option<usize>,
    pub genotype: DecodedGenotype,
    /// FORMAT field values, aligned with `schema.columns()`.
    pub values: Vec<Option<String>>,
}

impl AnnotatedRow {
    pub fn format(&self) -> &str {
        self.schema.format()
    }

    pub fn multiallele(&self) -> u8 {
        u8::from(self.genotype.multiallele)
    }

    pub fn phase(&self) -> Option<Phase> {
        self.genotype.phase
    }

    pub fn gt1(&self) -> Option<usize> {
        self.genotype.gt1
    }

    pub fn gt2(&self) -> Option<usize> {
        self.genotype.gt2
    }

    pub fn a1(&self) -> Option<&str> {
        self.genotype.a1.as_deref()
    }

    pub fn a2(&self) -> Option<&str> {
        self.genotype.a2.as_deref()
    }

    pub fn vartype1(&self) -> Option<VarType> {
        self.genotype.vartype1
    }

    pub fn vartype2(&self) -> Option<VarType> {
        self.genotype.vartype2
    }

    pub fn zygosity(&self) -> Zygosity {
        self.genotype.zygosity
    }

    ///
    /// Value of a FORMAT derived column (e.g. `DP` or `AD_2`), `None` when null or
    /// when the row's FORMAT does not carry that field.
    ///
    pub fn field(&self, column: &str) -> Option<&str> {
        self.schema
            .column_index(column)
            .and_then(|i| self.values.get(i))
            .and_then(|v| v.as_deref())
    }

    ///
    /// Render any output column as text; `None` is a null cell.
    ///
    pub fn cell(&self, column: &str) -> Option<String> {
        let g = &self.genotype;
        match column {
            "CHROM" => Some(self.key.chrom.clone()),
            "POS" => Some(self.key.pos.to_string()),
            "REF" => Some(self.key.ref_allele.clone()),
            "ALT" => Some(self.key.alt.clone()),
            "sample_ids" => Some(self.sample_id.clone()),
            "sample_genotypes" => self.sample_genotype.clone(),
            "FORMAT" => Some(self.format().to_string()),
            HOM_REF_COLUMN => self.hom_ref_count.map(|n| n.to_string()),
            "multiallele" => Some(self.multiallele().to_string()),
            "phase" => g.phase.map(|p| p.as_str().to_string()),
            "a1" => g.a1.clone(),
            "a2" => g.a2.clone(),
            "GT1" => g.gt1.map(|i| i.to_string()),
            "GT2" => g.gt2.map(|i| i.to_string()),
            "vartype1" => g.vartype1.map(|v| v.as_str().to_string()),
            "vartype2" => g.vartype2.map(|v| v.as_str().to_string()),
            "zygosity" => Some(g.zygosity.as_str().to_string()),
            other => self.field(other).map(String::from),
        }
    }

    ///
    /// Tab separated line for the given columns; nulls render as empty cells.
    ///
    pub fn as_tsv_line<S: AsRef<str>>(&self, columns: &[S]) -> String {
        columns
            .iter()
            .map(|c| self.cell(c.as_ref()).unwrap_or_default())
            .collect::<Vec<String>>()
            .join("\t")
    }
}

///
/// The annotated long-form table produced for one chunk.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotatedTable {
    rows: Vec<AnnotatedRow>,
    field_columns: Vec<String>,
    hom_ref_counts: Option<FxHashMap<VariantKey, usize>>,
}

impl AnnotatedTable {
    pub fn new(
        rows: Vec<AnnotatedRow>,
        field_columns: Vec<String>,
        hom_ref_counts: Option<FxHashMap<VariantKey, usize>>,
    ) -> Self {
        AnnotatedTable {
            rows,
            field_columns,
            hom_ref_counts,
        }
    }

    pub fn rows(&self) -> &[AnnotatedRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<AnnotatedRow> {
        self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnnotatedRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Union of the FORMAT derived columns over every group, in first-seen order.
    pub fn field_columns(&self) -> &[String] {
        &self.field_columns
    }

    pub fn has_hom_ref_counts(&self) -> bool {
        self.hom_ref_counts.is_some()
    }

    ///
    /// Hom-ref calls per variant, including variants where every selected sample was
    /// hom-ref and no row survived. `None` when hom-ref collapsing was disabled.
    ///
    pub fn hom_ref_counts(&self) -> Option<&FxHashMap<VariantKey, usize>> {
        self.hom_ref_counts.as_ref()
    }

    pub fn total_hom_ref(&self) -> usize {
        self.hom_ref_counts
            .as_ref()
            .map_or(0, |counts| counts.values().sum())
    }

    ///
    /// Full output column list: key columns, `hom_ref_counts` when present, the
    /// genotype annotations, then the FORMAT derived columns.
    ///
    pub fn columns(&self) -> Vec<String> {
        output_columns(&self.field_columns, self.has_hom_ref_counts())
    }

    pub fn get(&self, key: &VariantKey, sample_id: &str) -> Option<&AnnotatedRow> {
        self.rows
            .iter()
            .find(|r| r.key == *key && r.sample_id == sample_id)
    }

    ///
    /// Append another chunk's table. Columns are unioned and hom-ref counts summed.
    ///
    pub fn append(&mut self, other: AnnotatedTable) {
        for column in other.field_columns {
            if !self.field_columns.contains(&column) {
                self.field_columns.push(column);
            }
        }
        if let Some(other_counts) = other.hom_ref_counts {
            let counts = self.hom_ref_counts.get_or_insert_with(FxHashMap::default);
            for (key, n) in other_counts {
                *counts.entry(key).or_insert(0) += n;
            }
        }
        self.rows.extend(other.rows);
    }

    pub fn to_tsv_string(&self) -> String {
        let columns = self.columns();
        let mut out = columns.join("\t");
        out.push('\n');
        for row in &self.rows {
            out.push_str(&row.as_tsv_line(&columns));
            out.push('\n');
        }
        out
    }

    ///
    /// Create Polars DataFrame. Column types are inferred over the whole table.
    ///
    #[cfg(feature = "dataframe")]
    pub fn to_polars(&self) -> PolarsResult<DataFrame> {
        let cursor = Cursor::new(self.to_tsv_string());

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .map_parse_options(|parse_options| parse_options.with_separator(b'\t'))
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(cursor)
            .finish()?;

        Ok(df)
    }
}

///
/// Output column list for a set of FORMAT derived columns.
///
pub fn output_columns(field_columns: &[String], with_hom_ref: bool) -> Vec<String> {
    let mut columns: Vec<String> = KEY_COLUMNS.iter().map(|c| c.to_string()).collect();
    if with_hom_ref {
        columns.push(HOM_REF_COLUMN.to_string());
    }
    columns.extend(ANNOTATION_COLUMNS.iter().map(|c| c.to_string()));
    columns.extend(field_columns.iter().cloned());
    columns
}

impl<'a> IntoIterator for &'a AnnotatedTable {
    type Item = &'a AnnotatedRow;
    type IntoIter = std::slice::Iter<'a, AnnotatedRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl Display for AnnotatedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnnotatedTable with {} rows and {} hom-ref calls collapsed.",
            self.len(),
            self.total_hom_ref()
        )
    }
}
