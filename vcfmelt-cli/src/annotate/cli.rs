use clap::{Arg, ArgAction, Command, value_parser};

pub const ANNOTATE_CMD: &str = "annotate";

pub fn create_annotate_cli() -> Command {
    Command::new(ANNOTATE_CMD)
        .author("Databio")
        .about("Melt a multi-sample VCF into one annotated row per variant and sample")
        .arg_required_else_help(true)
        .arg(
            Arg::new("vcf")
                .required(true)
                .help("Path to a VCF or VCF.gz file, or - for stdin"),
        )
        .arg(
            Arg::new("samples")
                .long("samples")
                .short('s')
                .default_value("all")
                .help("Comma separated sample ids to annotate, or 'all'"),
        )
        .arg(
            Arg::new("chunksize")
                .long("chunksize")
                .short('c')
                .value_parser(value_parser!(usize))
                .help("Number of VCF rows annotated at a time"),
        )
        .arg(
            Arg::new("split")
                .long("split")
                .action(ArgAction::Append)
                .help("Split a FORMAT field into numbered columns, e.g. AD:2 (repeatable)"),
        )
        .arg(
            Arg::new("keep-hom-ref")
                .long("keep-hom-ref")
                .action(ArgAction::SetTrue)
                .help("Keep 0/0 and 0|0 calls as rows instead of counting them"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("TOML file with annotation settings; flags override it"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Output .tsv or .tsv.gz file (default: stdout)"),
        )
}
