use std::sync::Arc;

use fxhash::FxHashMap;
use log::debug;

use vcfmelt_core::{RawChunk, SelectionError, VariantKey};

use crate::config::AnnotationConfig;
use crate::error::Result;
use crate::genotype::decode_genotype;
use crate::reshape::{LongRow, collapse_hom_ref, group_by_format, melt};
use crate::schema::FormatSchema;
use crate::table::{AnnotatedRow, AnnotatedTable};

///
/// Map the requested sample ids onto column positions of the chunk.
///
pub fn resolve_sample_indices(chunk: &RawChunk, samples: &[String]) -> Result<Vec<usize>> {
    if samples.is_empty() {
        return Err(SelectionError::MissingSamples.into());
    }

    let mut indices = Vec::with_capacity(samples.len());
    for sample in samples {
        let index = chunk
            .sample_index(sample)
            .ok_or_else(|| SelectionError::UnknownSample(sample.clone()))?;
        if !indices.contains(&index) {
            indices.push(index);
        }
    }

    Ok(indices)
}

fn decode_row(
    schema: &Arc<FormatSchema>,
    row: LongRow<'_>,
    hom_ref_count: Option<usize>,
) -> Result<AnnotatedRow> {
    let parsed = schema.parse_sample(row.key, row.sample_id, row.genotype)?;
    let genotype = decode_genotype(row.key, parsed.gt);

    Ok(AnnotatedRow {
        key: row.key.clone(),
        sample_id: row.sample_id.to_string(),
        sample_genotype: row.genotype.map(String::from),
        schema: Arc::clone(schema),
        hom_ref_count,
        genotype,
        values: parsed.values,
    })
}

///
/// Annotate one chunk of raw VCF rows.
///
/// For every FORMAT group the selected sample columns are melted into one row per
/// (variant, sample). With `drop_hom_ref` the exact `0/0` and `0|0` calls are counted
/// per variant and removed before decoding; the count is attached to every surviving
/// row of that variant. The remaining rows get their GT value decoded and their other
/// FORMAT fields attached as columns.
///
/// # Arguments
/// - chunk: raw rows as read by the chunk reader
/// - samples: sample ids to annotate, a non-empty subset of `chunk.samples`
/// - config: split map and hom-ref collapsing switch
///
pub fn annotate_chunk(
    chunk: &RawChunk,
    samples: &[String],
    config: &AnnotationConfig,
) -> Result<AnnotatedTable> {
    config.validate()?;
    let sample_indices = resolve_sample_indices(chunk, samples)?;

    let groups = group_by_format(chunk, &config.split_columns);
    debug!(
        "chunk {}: {} rows in {} FORMAT groups",
        chunk.index,
        chunk.len(),
        groups.len()
    );

    let mut rows: Vec<AnnotatedRow> = Vec::new();
    let mut field_columns: Vec<String> = Vec::new();
    let mut hom_ref_counts: Option<FxHashMap<VariantKey, usize>> =
        config.drop_hom_ref.then(FxHashMap::default);

    for group in &groups {
        for column in group.schema.columns() {
            if !field_columns.contains(column) {
                field_columns.push(column.clone());
            }
        }

        let long = melt(chunk, group, &sample_indices);
        let melted = long.len();

        if let Some(totals) = hom_ref_counts.as_mut() {
            let (survivors, counts) = collapse_hom_ref(long);
            debug!(
                "FORMAT {}: {} calls, {} hom-ref collapsed",
                group.schema.format(),
                melted,
                melted - survivors.len()
            );
            for row in survivors {
                let count = counts.get(row.key).copied().unwrap_or(0);
                rows.push(decode_row(&group.schema, row, Some(count))?);
            }
            for (key, n) in counts {
                *totals.entry(key.clone()).or_insert(0) += n;
            }
        } else {
            debug!("FORMAT {}: {} calls", group.schema.format(), melted);
            for row in long {
                rows.push(decode_row(&group.schema, row, None)?);
            }
        }
    }

    Ok(AnnotatedTable::new(rows, field_columns, hom_ref_counts))
}
