use clap::{Arg, Command};

pub const HEADER_CMD: &str = "header";

pub fn create_header_cli() -> Command {
    Command::new(HEADER_CMD)
        .author("Databio")
        .about("Print the samples, columns and metadata of a VCF header")
        .arg_required_else_help(true)
        .arg(
            Arg::new("vcf")
                .required(true)
                .help("Path to a VCF or VCF.gz file"),
        )
}
