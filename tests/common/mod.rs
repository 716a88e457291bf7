use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

const META_LINES: [&str; 2] = ["##fileformat=VCFv4.2", "##source=queengt-test"];

const QUEEN1_DRONES: usize = 10;
const QUEEN2_DRONES: usize = 5;
const N_SAMPLES: usize = QUEEN1_DRONES + QUEEN2_DRONES + 1;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

#[derive(Clone, Copy)]
pub enum VcfFlavor {
    Plain,
    Gzipped,
    DiploidCoded,
}

pub struct Dataset {
    pub vcf: PathBuf,
    pub pedigree: PathBuf,
    pub output_dir: PathBuf,
}

struct FixtureSite {
    fixed: [&'static str; 8],
    tokens: [&'static str; N_SAMPLES],
}

// Sites exercise every call class: clean homozygotes, a minor fraction
// exactly at the default threshold, one just below it, an evidence-floor
// miss, a third-allele token, and an all-missing family.
#[rustfmt::skip]
const SITES: [FixtureSite; 4] = [
    FixtureSite {
        fixed: ["chr1", "100", ".", "A", "T", "50", "PASS", "DP=100"],
        tokens: ["0", "0", "0", "0", "0", "0", "0", "0", "0", "0",
                 "1", "1", "1", "1", "1", "0"],
    },
    FixtureSite {
        fixed: ["chr1", "200", ".", "C", "G", "99", "PASS", "DP=88"],
        tokens: ["0", "0", "0", "0", "0", "0", "0", "1", ".", ".",
                 "0", "0", ".", ".", ".", "1"],
    },
    FixtureSite {
        fixed: ["chr2", "300", "rs42", "G", "T,G", "10", "PASS", "DP=5"],
        tokens: ["0", "0", "0", "0", "0", "0", "0", "0", "0", "1",
                 "2", "0", "0", "0", "0", "."],
    },
    FixtureSite {
        fixed: ["chr2", "400", ".", "T", "A", "50", "PASS", "."],
        tokens: ["0", "0", "0", "0", "0", "1", "1", "1", "1", "1",
                 ".", ".", ".", ".", ".", "0"],
    },
];

pub fn create_dataset(flavor: VcfFlavor, label: &str) -> io::Result<Dataset> {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    let base_dir = std::env::temp_dir().join("queengt-tests").join(format!(
        "{}-{}-{}",
        std::process::id(),
        id,
        label
    ));
    fs::create_dir_all(&base_dir)?;

    let pedigree = base_dir.join("pedigree.txt");
    write_pedigree(&pedigree)?;

    let vcf = match flavor {
        VcfFlavor::Gzipped => base_dir.join("drones.vcf.gz"),
        _ => base_dir.join("drones.vcf"),
    };
    let content = vcf_content(flavor);
    match flavor {
        VcfFlavor::Gzipped => {
            let file = File::create(&vcf)?;
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(content.as_bytes())?;
            encoder.finish()?;
        }
        _ => fs::write(&vcf, content)?,
    }

    Ok(Dataset {
        vcf,
        pedigree,
        output_dir: base_dir.join("output"),
    })
}

fn sample_names() -> Vec<String> {
    let mut names: Vec<String> = (1..=QUEEN1_DRONES).map(|i| format!("d{i:02}")).collect();
    names.extend((1..=QUEEN2_DRONES).map(|i| format!("e{i:02}")));
    names.push("stray".to_string());
    names
}

pub fn expected_vcf() -> String {
    let mut out = String::new();
    for line in META_LINES {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tQ1\tQ2\n");
    out.push_str("chr1\t100\t.\tA\tT\t50\tPASS\tDP=100\tGT\t0/0\t1/1\n");
    out.push_str("chr1\t200\t.\tC\tG\t99\tPASS\tDP=88\tGT\t0/1\t./.\n");
    out.push_str("chr2\t300\trs42\tG\tT,G\t10\tPASS\tDP=5\tGT\t0/0\t0/0\n");
    out.push_str("chr2\t400\t.\tT\tA\t50\tPASS\t.\tGT\t0/1\t./.\n");
    out
}

pub fn expected_summary() -> String {
    let mut out = String::new();
    out.push_str("queen,n_drones,n_hom_ref,n_hom_alt,n_het,n_missing\n");
    out.push_str("Q1,10,2,0,2,0\n");
    out.push_str("Q2,5,1,1,0,2\n");
    out
}

fn write_pedigree(path: &PathBuf) -> io::Result<()> {
    let mut file = File::create(path)?;
    for i in 1..=QUEEN1_DRONES {
        writeln!(file, "d{i:02} Q1")?;
    }
    for i in 1..=QUEEN2_DRONES {
        writeln!(file, "e{i:02} Q2")?;
    }
    Ok(())
}

fn diploid_token(token: &str) -> String {
    match token {
        "." => "./.".to_string(),
        t => format!("{t}/{t}"),
    }
}

fn vcf_content(flavor: VcfFlavor) -> String {
    let mut out = String::new();
    for line in META_LINES {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT");
    for name in sample_names() {
        out.push('\t');
        out.push_str(&name);
    }
    out.push('\n');
    for site in &SITES {
        out.push_str(&site.fixed.join("\t"));
        out.push_str("\tGT:DP");
        for token in &site.tokens {
            let gt = match flavor {
                VcfFlavor::DiploidCoded => diploid_token(token),
                _ => token.to_string(),
            };
            out.push('\t');
            out.push_str(&gt);
            out.push_str(":9");
        }
        out.push('\n');
    }
    out
}
