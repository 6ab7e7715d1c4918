use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use vcfmelt_io::VcfHeader;

fn write_summary<W: Write>(header: &VcfHeader, out: &mut W) -> io::Result<()> {
    writeln!(out, "compression\t{:?}", header.compression())?;
    writeln!(out, "columns\t{}", header.columns().join(","))?;
    writeln!(out, "samples\t{}", header.samples().len())?;
    for sample in header.samples() {
        writeln!(out, "sample\t{sample}")?;
    }
    for entry in header.meta() {
        writeln!(out, "{}\t{}", entry.key, entry.value)?;
    }
    Ok(())
}

pub fn run_header(matches: &ArgMatches) -> Result<()> {
    let vcf = matches
        .get_one::<String>("vcf")
        .context("A path to a VCF file is required.")?;

    let header = VcfHeader::from_path(Path::new(vcf))?;

    let stdout = io::stdout();
    write_summary(&header, &mut stdout.lock())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_write_summary() {
        let header = VcfHeader::from_path(Path::new("../tests/data/vcf/cohort.vcf.gz")).unwrap();
        let mut out = Vec::new();
        write_summary(&header, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "compression\tGzip");
        assert_eq!(lines[2], "samples\t3");
        assert_eq!(lines[3], "sample\tS1");
        assert_eq!(lines[6], "fileformat\tVCFv4.2");
        assert_eq!(lines.len(), 6 + 7);
    }
}
