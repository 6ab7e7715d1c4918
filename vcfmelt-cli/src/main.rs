mod annotate;
mod header;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "vcfmelt";
    pub const BIN_NAME: &str = "vcfmelt";
    pub const VERBOSE_ARG: &str = "verbose";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Reshape multi-sample VCF files into one annotated row per variant and sample.")
        .subcommand_required(true)
        .arg(
            Arg::new(consts::VERBOSE_ARG)
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log per-chunk details"),
        )
        .subcommand(annotate::cli::create_annotate_cli())
        .subcommand(header::cli::create_header_cli())
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag(consts::VERBOSE_ARG) {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // ANNOTATE
        //
        Some((annotate::cli::ANNOTATE_CMD, matches)) => {
            init_logging(matches);
            annotate::handlers::run_annotate(matches)?;
        }

        //
        // HEADER
        //
        Some((header::cli::HEADER_CMD, matches)) => {
            init_logging(matches);
            header::handlers::run_header(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    fn test_parser_is_valid() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_verbose_reaches_subcommand() {
        let matches = build_parser()
            .try_get_matches_from(["vcfmelt", "header", "in.vcf", "--verbose"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();

        assert!(sub.get_flag(consts::VERBOSE_ARG));
    }
}
