use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use flate2::Compression;
use flate2::write::GzEncoder;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use vcfmelt_annotate::{AnnotationConfig, SplitSpec, annotate_chunk};
use vcfmelt_core::SampleSelection;
use vcfmelt_core::consts::DEFAULT_CHUNKSIZE;
use vcfmelt_io::{AnnotatedTsvWriter, ReaderOptions, VcfReader};

///
/// Settings from `--config`, with the command line flags applied on top.
///
fn build_config(matches: &ArgMatches) -> Result<AnnotationConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => AnnotationConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load annotation config {path}"))?,
        None => AnnotationConfig::default(),
    };

    if let Some(specs) = matches.get_many::<String>("split") {
        for spec in specs {
            let spec: SplitSpec = spec.parse()?;
            config = config.with_split_column(spec.field, spec.arity);
        }
    }

    if matches.get_flag("keep-hom-ref") {
        config = config.with_drop_hom_ref(false);
    }

    config.validate()?;
    Ok(config)
}

fn build_options(matches: &ArgMatches) -> Result<ReaderOptions> {
    let samples: SampleSelection = matches
        .get_one::<String>("samples")
        .map(String::as_str)
        .unwrap_or("all")
        .parse()?;
    let chunksize = matches
        .get_one::<usize>("chunksize")
        .copied()
        .unwrap_or(DEFAULT_CHUNKSIZE);

    Ok(ReaderOptions::default()
        .with_samples(samples)
        .with_chunksize(chunksize))
}

///
/// Annotate every chunk of `reader` and write it through `out`.
///
fn stream<W: Write>(reader: VcfReader, out: W, config: &AnnotationConfig) -> Result<W> {
    let samples = reader.samples().to_vec();
    let mut writer = AnnotatedTsvWriter::from_header(out, reader.header(), config);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg} ({pos} chunks)")?,
    );
    pb.set_message(format!("Annotating {}", reader.path().display()));

    let mut hom_ref = 0;
    for chunk in reader {
        let chunk = chunk?;
        let table = annotate_chunk(&chunk, &samples, config)
            .with_context(|| format!("Failed to annotate chunk {}", chunk.index))?;
        hom_ref += table.total_hom_ref();
        writer.write_table(&table)?;
        pb.inc(1);
    }

    pb.finish_with_message(format!(
        "Wrote {} rows, {} hom-ref calls collapsed",
        writer.rows_written(),
        hom_ref
    ));

    Ok(writer.finish()?)
}

pub fn run_annotate(matches: &ArgMatches) -> Result<()> {
    let vcf = matches
        .get_one::<String>("vcf")
        .context("A path to a VCF file is required.")?;

    let config = build_config(matches)?;
    let options = build_options(matches)?;
    let reader = VcfReader::open(vcf, options)?;

    match matches.get_one::<String>("output") {
        Some(output) => {
            let path = Path::new(output);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = BufWriter::new(File::create(path)?);

            if output.ends_with(".gz") {
                let encoder = GzEncoder::new(file, Compression::default());
                stream(reader, encoder, &config)?.finish()?.flush()?;
            } else {
                stream(reader, file, &config)?;
            }
            info!("Annotated table written to {output}");
        }
        None => {
            stream(reader, BufWriter::new(io::stdout().lock()), &config)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Read;

    use flate2::read::MultiGzDecoder;
    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::build_parser;

    fn annotate_matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["vcfmelt", "annotate"];
        argv.extend_from_slice(args);
        let matches = build_parser().try_get_matches_from(argv).unwrap();
        matches.subcommand_matches("annotate").unwrap().clone()
    }

    #[rstest]
    fn test_flags_override_config_file() {
        let matches = annotate_matches(&[
            "in.vcf",
            "--config",
            "../tests/data/vcf/annotate.toml",
            "--split",
            "AD:3",
            "--split",
            "PL:3",
        ]);
        let config = build_config(&matches).unwrap();

        assert_eq!(config.split_arity("AD"), Some(3));
        assert_eq!(config.split_arity("PL"), Some(3));
        assert_eq!(config.drop_hom_ref, false);
    }

    #[rstest]
    #[case(&["in.vcf"], true)]
    #[case(&["in.vcf", "--keep-hom-ref"], false)]
    fn test_keep_hom_ref(#[case] args: &[&str], #[case] drop_hom_ref: bool) {
        let config = build_config(&annotate_matches(args)).unwrap();
        assert_eq!(config.drop_hom_ref, drop_hom_ref);
    }

    #[rstest]
    fn test_bad_split_spec() {
        let matches = annotate_matches(&["in.vcf", "--split", "AD"]);
        assert!(build_config(&matches).is_err());
    }

    #[rstest]
    fn test_options() {
        let matches = annotate_matches(&["in.vcf", "--samples", "S1,S3", "-c", "10"]);
        let options = build_options(&matches).unwrap();

        assert_eq!(
            options.samples,
            SampleSelection::Ids(vec!["S1".to_string(), "S3".to_string()])
        );
        assert_eq!(options.chunksize, 10);
    }

    #[rstest]
    #[case("annotated.tsv")]
    #[case("annotated.tsv.gz")]
    fn test_run_annotate(#[case] name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out").join(name);
        let output_str = output.to_string_lossy().to_string();

        let matches = annotate_matches(&[
            "../tests/data/vcf/cohort.vcf",
            "--chunksize",
            "2",
            "--output",
            &output_str,
        ]);
        run_annotate(&matches).unwrap();

        let mut text = String::new();
        let file = File::open(&output).unwrap();
        if name.ends_with(".gz") {
            MultiGzDecoder::new(file).read_to_string(&mut text).unwrap();
        } else {
            io::BufReader::new(file).read_to_string(&mut text).unwrap();
        }

        assert_eq!(text.lines().count(), 10);
        assert!(text.starts_with("CHROM\tPOS\tREF\tALT\tsample_ids\tsample_genotypes\tFORMAT\thom_ref_counts"));
    }
}
