use std::path::{Path, PathBuf};

use rayon::ThreadPoolBuilder;

use crate::Args;
use crate::caller::Inference;
use crate::error::{CustomError, Result};
use crate::output::{write_genotype_summary, write_queen_vcf};
use crate::pedigree::Pedigree;
use crate::reader::SiteSource;
use crate::reader::vcf::{GenotypeCoding, VcfReader};

#[derive(Debug, Clone)]
pub struct InputSpec {
    vcf: PathBuf,
    pedigree: PathBuf,
    output_dir: PathBuf,
    coding: GenotypeCoding,
    skip_rows: Option<usize>,
    threshold: f64,
    threads: Option<usize>,
}

impl InputSpec {
    pub fn print_paths(&self) {
        println!("VCF     : {}", self.vcf.display());
        println!("PEDIGREE: {}", self.pedigree.display());
        println!();
    }

    pub fn open_reader(&self) -> Result<VcfReader> {
        VcfReader::open(&self.vcf, self.coding, self.skip_rows)
    }

    pub fn pedigree_path(&self) -> &Path {
        self.pedigree.as_path()
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_path()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn threads(&self) -> Option<usize> {
        self.threads
    }
}

pub fn build_input_spec(args: &Args) -> Result<InputSpec> {
    if !(args.het_threshold > 0.0 && args.het_threshold <= 0.5) {
        return Err(CustomError::ThresholdRange {
            value: args.het_threshold,
        });
    }
    let coding = if args.diploid_coded {
        GenotypeCoding::DiploidHomozygous
    } else {
        GenotypeCoding::Haploid
    };
    Ok(InputSpec {
        vcf: PathBuf::from(&args.vcf),
        pedigree: PathBuf::from(&args.pedigree),
        output_dir: PathBuf::from(&args.output_directory),
        coding,
        skip_rows: args.skip_rows,
        threshold: args.het_threshold,
        threads: args.threads,
    })
}

pub fn run(mut reader: VcfReader, pedigree: &Pedigree, spec: &InputSpec) -> Result<()> {
    const PARALLEL_THRESHOLD: usize = 32;

    let families = pedigree.resolve_columns(reader.samples())?;
    let matched: usize = families.iter().map(|f| f.columns.len()).sum();
    println!(
        "Matched {matched} of {} pedigree drones across {} queens",
        pedigree.n_drones(),
        pedigree.n_queens()
    );

    let meta_lines = reader.meta_lines().to_vec();

    let inference = Inference::new(families, spec.threshold());
    let inference = if (spec.threads().is_none() && pedigree.n_queens() < PARALLEL_THRESHOLD)
        || spec.threads() == Some(1)
    {
        inference.consume_reader(&mut reader)?
    } else if let Some(n) = spec.threads() {
        let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
        pool.install(|| inference.consume_reader_parallel(&mut reader))?
    } else {
        inference.consume_reader_parallel(&mut reader)?
    };

    let vcf_path = spec.output_dir().join("queen_genotypes.vcf");
    println!("Writing queen genotype VCF to {}...", vcf_path.display());
    write_queen_vcf(&inference, &meta_lines, &vcf_path)?;

    let summary_path = spec.output_dir().join("queen_genotype_summary.csv");
    println!("Writing per-queen summary to {}...", summary_path.display());
    write_genotype_summary(&inference, &summary_path)?;
    Ok(())
}
