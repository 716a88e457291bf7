mod caller;
mod cli;
mod error;
mod model;
mod output;
mod pedigree;
mod reader;

use chrono::Local;
use clap::Parser;
use miette::IntoDiagnostic;

use crate::error::Result;
use crate::pedigree::Pedigree;

/// Infer queen genotypes from the haploid genotypes of their drone offspring.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Input VCF file, plain text or gzipped.
    #[arg(short, long)]
    vcf: String,

    /// Two-column whitespace-separated file mapping each drone ID to its queen ID.
    #[arg(short, long)]
    pedigree: String,

    /// Output directory.
    #[arg(
        short,
        long,
        value_hint = clap::ValueHint::DirPath,
        default_value_t = format!("queengt_output_{}", Local::now().format("%Y%m%d_%H%M%S"))
    )]
    output_directory: String,

    /// Minimum minor-allele fraction among a queen's informative drones to
    /// call her heterozygous.
    #[arg(long, default_value_t = 0.125)]
    het_threshold: f64,

    /// Treat the first N lines as header and line N + 1 as the #CHROM
    /// column line, instead of detecting the header by '#' prefixes.
    #[arg(long)]
    skip_rows: Option<usize>,

    /// Drone genotypes are recorded as diploid homozygotes (e.g. 0/0)
    /// rather than haploid calls.
    #[arg(long)]
    diploid_coded: bool,

    /// Number of threads for per-site classification.
    #[arg(short, long)]
    threads: Option<usize>,
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    std::fs::create_dir_all(&args.output_directory)
        .map_err(|e| error::CustomError::OutputDir { source: e })?;

    let input_spec = cli::build_input_spec(&args)?;
    input_spec.print_paths();

    let pedigree = Pedigree::load(&input_spec.pedigree_path())?;
    let reader = input_spec.open_reader()?;
    cli::run(reader, &pedigree, &input_spec)?;
    Ok(())
}

fn main() -> miette::Result<()> {
    try_main().into_diagnostic()
}
