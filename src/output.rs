use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use itertools::Itertools;

use crate::caller::Inference;
use crate::error::{CustomError, Result};
use crate::model::QueenGenotype;

/// Write the inferred queen genotypes as a VCF: the input's meta header
/// replayed verbatim, queens as the sample columns, FORMAT fixed to GT.
pub fn write_queen_vcf(inference: &Inference, meta_lines: &[String], path: &Path) -> Result<()> {
    queen_vcf_body(inference, meta_lines, path).map_err(|e| CustomError::Write {
        source: e,
        path: path.to_path_buf(),
    })
}

fn queen_vcf_body(
    inference: &Inference,
    meta_lines: &[String],
    path: &Path,
) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);

    for line in meta_lines {
        writeln!(out, "{line}")?;
    }
    writeln!(
        out,
        "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t{}",
        inference.queens().join("\t")
    )?;
    for site in inference.sites() {
        writeln!(
            out,
            "{}\tGT\t{}",
            site.fixed.iter().join("\t"),
            site.genotypes.iter().map(|g| g.as_vcf()).join("\t")
        )?;
    }
    out.flush()
}

/// Write one CSV row per queen: informative drone count and how many
/// sites fell into each call class.
pub fn write_genotype_summary(inference: &Inference, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&[
        "queen",
        "n_drones",
        "n_hom_ref",
        "n_hom_alt",
        "n_het",
        "n_missing",
    ])?;

    for (idx, family) in inference.families().iter().enumerate() {
        let mut hom_ref = 0u64;
        let mut hom_alt = 0u64;
        let mut het = 0u64;
        let mut missing = 0u64;
        for site in inference.sites() {
            match site.genotypes[idx] {
                QueenGenotype::HomRef => hom_ref += 1,
                QueenGenotype::HomAlt => hom_alt += 1,
                QueenGenotype::Het => het += 1,
                QueenGenotype::Missing => missing += 1,
            }
        }
        wtr.serialize((
            family.queen.as_str(),
            family.columns.len(),
            hom_ref,
            hom_alt,
            het,
            missing,
        ))?;
    }
    wtr.flush().map_err(|e| CustomError::Write {
        source: e,
        path: path.to_path_buf(),
    })?;
    Ok(())
}
