use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("could not read {path}")]
    ReadWithPath {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not write to {path}")]
    Write {
        #[source]
        source: std::io::Error,
        path: std::path::PathBuf,
    },

    #[error("could not write to CSV")]
    CsvWrite(#[from] csv::Error),

    #[error("could not create output directory")]
    OutputDir {
        #[source]
        source: std::io::Error,
    },

    #[error("no #CHROM column line found in {path}")]
    VcfColumnLine { path: std::path::PathBuf },

    #[error("VCF {path} has no sample columns")]
    VcfNoSamples { path: std::path::PathBuf },

    #[error("expected {expected} tab-separated fields (got {n_fields}) in line {line_num} of VCF")]
    VcfRecordFields {
        line_num: usize,
        n_fields: usize,
        expected: usize,
    },

    #[error("expected 2 whitespace-separated fields (got {n_fields}) in line {line_num} of pedigree file")]
    PedigreeFields { line_num: usize, n_fields: usize },

    #[error("pedigree file {path} lists no drones")]
    PedigreeEmpty { path: std::path::PathBuf },

    #[error("drone {drone} is listed under both queen {first} and queen {second}")]
    PedigreeDuplicateDrone {
        drone: String,
        first: String,
        second: String,
    },

    #[error("no drone in the pedigree matches a VCF sample column")]
    NoInformativeDrones,

    #[error("heterozygosity threshold must be within (0, 0.5] (got {value})")]
    ThresholdRange { value: f64 },

    #[error("could not build thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, CustomError>;
