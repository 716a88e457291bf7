use std::io::BufRead;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::{CustomError, Result};
use crate::model::{AlleleCall, Site};
use crate::reader::{SiteSource, open_text};

/// Fixed VCF columns preceding the sample columns (CHROM through FORMAT).
pub const N_FIXED_FIELDS: usize = 9;

/// How drone genotypes are encoded in the input VCF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenotypeCoding {
    /// One allele index per call, e.g. `0` or `1`.
    Haploid,
    /// Haploid individuals recorded by the variant caller as diploid
    /// homozygotes, e.g. `0/0`. Collapsed to one allele index before the
    /// symbol model; mixed-allele tokens collapse to missing.
    DiploidHomozygous,
}

impl GenotypeCoding {
    /// Reduce the leading GT subfield of a sample value to a haploid token.
    fn haploid_token(self, raw: &str) -> &str {
        let gt = raw.split(':').next().unwrap_or(raw);
        match self {
            GenotypeCoding::Haploid => gt,
            GenotypeCoding::DiploidHomozygous => match gt.split_once(['/', '|']) {
                Some((a, b)) if a == b => a,
                Some(_) => ".",
                None => gt,
            },
        }
    }
}

pub struct VcfReader {
    reader: Box<dyn BufRead + Send>,
    path: PathBuf,
    meta_lines: Vec<String>,
    samples: Vec<String>,
    coding: GenotypeCoding,
    line_num: usize,
    done: bool,
}

impl VcfReader {
    /// Open a plain or gzipped VCF and consume its header. With
    /// `skip_rows = Some(n)` the first n lines are taken as header verbatim
    /// and line n + 1 as the column line; otherwise the header is detected
    /// by `#` prefixes.
    pub fn open(
        path: &impl AsRef<Path>,
        coding: GenotypeCoding,
        skip_rows: Option<usize>,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = open_text(&path)?;
        let mut meta_lines = Vec::new();
        let mut line_num = 0usize;

        let column_line = match skip_rows {
            Some(n) => {
                for _ in 0..n {
                    match read_trimmed_line(reader.as_mut(), &path)? {
                        Some(line) => {
                            line_num += 1;
                            meta_lines.push(line);
                        }
                        None => return Err(CustomError::VcfColumnLine { path }),
                    }
                }
                line_num += 1;
                read_trimmed_line(reader.as_mut(), &path)?
                    .ok_or_else(|| CustomError::VcfColumnLine { path: path.clone() })?
            }
            None => loop {
                let line = read_trimmed_line(reader.as_mut(), &path)?
                    .ok_or_else(|| CustomError::VcfColumnLine { path: path.clone() })?;
                line_num += 1;
                if line.starts_with("##") {
                    meta_lines.push(line);
                } else if line.starts_with('#') {
                    break line;
                } else {
                    return Err(CustomError::VcfColumnLine { path });
                }
            },
        };

        let columns: Vec<&str> = column_line.trim_start_matches('#').split('\t').collect();
        if columns.len() <= N_FIXED_FIELDS {
            return Err(CustomError::VcfNoSamples { path });
        }
        let samples: Vec<String> = columns[N_FIXED_FIELDS..]
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        let duplicated: Vec<&String> = samples.iter().duplicates().collect();
        if !duplicated.is_empty() {
            eprintln!(
                "Warning: duplicate sample columns in VCF header: {}",
                duplicated.iter().join(", ")
            );
        }

        Ok(Self {
            reader,
            path,
            meta_lines,
            samples,
            coding,
            line_num,
            done: false,
        })
    }

    /// Header lines preceding the column line, verbatim.
    pub fn meta_lines(&self) -> &[String] {
        &self.meta_lines
    }
}

impl SiteSource for VcfReader {
    fn samples(&self) -> &[String] {
        &self.samples
    }
}

impl Iterator for VcfReader {
    type Item = Result<Site>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let line = match read_trimmed_line(self.reader.as_mut(), &self.path) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };
            self.line_num += 1;

            // Stray header or blank lines between records carry no calls.
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            let expected = N_FIXED_FIELDS + self.samples.len();
            if fields.len() != expected {
                // Poison iterator to prevent further reads
                self.done = true;
                return Some(Err(CustomError::VcfRecordFields {
                    line_num: self.line_num,
                    n_fields: fields.len(),
                    expected,
                }));
            }

            // FORMAT is dropped here; queen output always re-declares GT.
            let fixed = fields[..N_FIXED_FIELDS - 1]
                .iter()
                .map(|s| s.to_string())
                .collect();
            let calls = fields[N_FIXED_FIELDS..]
                .iter()
                .map(|raw| AlleleCall::from_token(self.coding.haploid_token(raw)))
                .collect();
            return Some(Ok(Site { fixed, calls }));
        }
        None
    }
}

fn read_trimmed_line(reader: &mut dyn BufRead, path: &Path) -> Result<Option<String>> {
    let mut line = String::new();
    let n = reader
        .read_line(&mut line)
        .map_err(|e| CustomError::ReadWithPath {
            source: e,
            path: path.to_path_buf(),
        })?;
    if n == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}
