use std::collections::BTreeMap;
use std::sync::Arc;

use fxhash::{FxHashMap, FxHashSet};

use vcfmelt_core::consts::MISSING_VALUE;
use vcfmelt_core::{RawChunk, RawChunkRow, VariantKey};

use crate::schema::FormatSchema;

/// Genotype strings collapsed into `hom_ref_counts`.
pub const HOM_REF_GENOTYPES: [&str; 2] = ["0/0", "0|0"];

///
/// Rows of one chunk sharing an identical FORMAT string.
///
#[derive(Debug, Clone)]
pub struct FormatGroup<'a> {
    pub schema: Arc<FormatSchema>,
    pub rows: Vec<&'a RawChunkRow>,
}

///
/// One (variant, sample) pair after the wide sample columns are melted.
/// A missing genotype marker (`.`) becomes `None`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongRow<'a> {
    pub key: &'a VariantKey,
    pub sample_id: &'a str,
    pub genotype: Option<&'a str>,
}

impl LongRow<'_> {
    pub fn is_hom_ref(&self) -> bool {
        self.genotype
            .is_some_and(|gt| HOM_REF_GENOTYPES.contains(&gt))
    }
}

///
/// Partition a chunk into FORMAT groups, in order of first appearance.
///
/// Reference-only rows (`ALT == "."`) are left out, so a FORMAT whose rows are all
/// reference-only produces no group at all.
///
pub fn group_by_format<'a>(
    chunk: &'a RawChunk,
    split_columns: &BTreeMap<String, usize>,
) -> Vec<FormatGroup<'a>> {
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut groups: Vec<FormatGroup<'a>> = Vec::new();

    for row in chunk.iter().filter(|row| !row.is_reference_only()) {
        let slot = *index.entry(row.format.as_str()).or_insert_with(|| {
            groups.push(FormatGroup {
                schema: Arc::new(FormatSchema::new(&row.format, split_columns)),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].rows.push(row);
    }

    groups
}

///
/// Reshape a FORMAT group into one row per (variant, sample).
///
/// `sample_indices` point into `chunk.samples`. A (variant, sample, genotype) call seen
/// twice is kept once; differing calls for the same (variant, sample) are all kept.
///
pub fn melt<'a>(
    chunk: &'a RawChunk,
    group: &FormatGroup<'a>,
    sample_indices: &[usize],
) -> Vec<LongRow<'a>> {
    let mut seen: FxHashSet<(&VariantKey, &str, Option<&str>)> = FxHashSet::default();
    let mut long = Vec::with_capacity(group.rows.len() * sample_indices.len());

    for &row in &group.rows {
        for &sample_index in sample_indices {
            let sample_id = chunk.samples[sample_index].as_str();
            let genotype = row
                .genotype(sample_index)
                .filter(|gt| *gt != MISSING_VALUE);
            if !seen.insert((&row.key, sample_id, genotype)) {
                continue;
            }
            long.push(LongRow {
                key: &row.key,
                sample_id,
                genotype,
            });
        }
    }

    long
}

///
/// Remove hom-ref calls from a melted group and count them per variant.
///
/// The counts only cover the samples that were melted. Variants without any
/// hom-ref call are absent from the map; look them up with a default of 0.
///
pub fn collapse_hom_ref<'a>(
    rows: Vec<LongRow<'a>>,
) -> (Vec<LongRow<'a>>, FxHashMap<&'a VariantKey, usize>) {
    let mut counts: FxHashMap<&'a VariantKey, usize> = FxHashMap::default();
    let mut survivors = Vec::with_capacity(rows.len());

    for row in rows {
        if row.is_hom_ref() {
            *counts.entry(row.key).or_insert(0) += 1;
        } else {
            survivors.push(row);
        }
    }

    (survivors, counts)
}
