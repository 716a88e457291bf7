use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::error::Result;
use crate::model::{AlleleCall, QueenGenotype, Site};
use crate::pedigree::FamilyColumns;
use crate::reader::SiteSource;

/// With this many informative drones or fewer, heterozygosity cannot be
/// told apart from sampling noise and the queen is left uncalled.
pub const EVIDENCE_FLOOR: u32 = 3;

/// Informative drone calls for one queen at one site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FamilyCounts {
    pub ref_count: u32,
    pub alt_count: u32,
}

impl FamilyCounts {
    /// Tally one queen's drones at one site. Missing calls are skipped;
    /// they are neither evidence nor absence of evidence.
    pub fn from_site(site: &Site, columns: &[usize]) -> Self {
        let mut counts = FamilyCounts::default();
        for &idx in columns {
            match site.calls[idx] {
                AlleleCall::Ref => counts.ref_count += 1,
                AlleleCall::Alt => counts.alt_count += 1,
                AlleleCall::Missing => {}
            }
        }
        counts
    }

    pub fn total(self) -> u32 {
        self.ref_count + self.alt_count
    }

    /// Classify the queen from these counts. First matching rule wins:
    /// evidence floor, single-allele evidence, then the minor-allele
    /// fraction against `threshold`.
    pub fn call(self, threshold: f64) -> QueenGenotype {
        let total = self.total();
        if total <= EVIDENCE_FLOOR {
            return QueenGenotype::Missing;
        }
        if self.alt_count == 0 {
            return QueenGenotype::HomRef;
        }
        if self.ref_count == 0 {
            return QueenGenotype::HomAlt;
        }
        let minor = self.ref_count.min(self.alt_count);
        if minor as f64 / total as f64 >= threshold {
            QueenGenotype::Het
        } else if self.ref_count > self.alt_count {
            QueenGenotype::HomRef
        } else {
            QueenGenotype::HomAlt
        }
    }
}

/// Genotypes called at one site, aligned to the queen order.
pub struct SiteCalls {
    pub fixed: Vec<String>,
    pub genotypes: Vec<QueenGenotype>,
}

/// Per-site driver: classifies every queen at every site in input order.
pub struct Inference {
    families: Vec<FamilyColumns>,
    threshold: f64,
    sites: Vec<SiteCalls>,
}

impl Inference {
    pub fn new(families: Vec<FamilyColumns>, threshold: f64) -> Self {
        Self {
            families,
            threshold,
            sites: Vec::new(),
        }
    }

    pub fn families(&self) -> &[FamilyColumns] {
        &self.families
    }

    pub fn queens(&self) -> Vec<&str> {
        self.families.iter().map(|f| f.queen.as_str()).collect()
    }

    pub fn sites(&self) -> &[SiteCalls] {
        &self.sites
    }

    pub fn consume_reader(mut self, reader: &mut dyn SiteSource) -> Result<Self> {
        let pb = ProgressBar::no_length();
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {spinner} {pos} sites").unwrap(),
        );

        for site in &mut *reader {
            let site = site?;
            self.sites.push(call_site(site, &self.families, self.threshold));
            pb.inc(1);
        }
        pb.abandon();
        Ok(self)
    }

    /// Reading stays sequential; classification fans out across sites.
    /// Order-preserving collection keeps the output deterministic.
    pub fn consume_reader_parallel(mut self, reader: &mut dyn SiteSource) -> Result<Self> {
        let raw: Vec<Site> = reader.collect::<Result<Vec<_>>>()?;

        let pb = ProgressBar::new(raw.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:30} {pos}/{len} sites").unwrap(),
        );

        let families = &self.families;
        let threshold = self.threshold;
        self.sites = raw
            .into_par_iter()
            .map(|site| {
                let calls = call_site(site, families, threshold);
                pb.inc(1);
                calls
            })
            .collect();
        pb.abandon();
        Ok(self)
    }
}

fn call_site(site: Site, families: &[FamilyColumns], threshold: f64) -> SiteCalls {
    let genotypes = families
        .iter()
        .map(|family| FamilyCounts::from_site(&site, &family.columns).call(threshold))
        .collect();
    SiteCalls {
        fixed: site.fixed,
        genotypes,
    }
}
