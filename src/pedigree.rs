use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

use itertools::Itertools;

use crate::error::{CustomError, Result};
use crate::reader::open_text;

/// One queen and her drones, in pedigree file order.
#[derive(Debug, Clone)]
pub struct Family {
    pub queen: String,
    pub drones: Vec<String>,
}

/// A queen and the VCF sample columns holding her drones' calls.
#[derive(Debug, Clone)]
pub struct FamilyColumns {
    pub queen: String,
    pub columns: Vec<usize>,
}

/// Immutable drone-to-queen mapping. Queens keep the order in which they
/// first appear in the file, so output ordering is reproducible.
#[derive(Debug)]
pub struct Pedigree {
    families: Vec<Family>,
}

impl Pedigree {
    /// Load a two-column whitespace-separated file: drone ID, queen ID.
    /// Plain text or gzipped.
    pub fn load(path: &impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = open_text(path)?;

        let mut families: Vec<Family> = Vec::new();
        let mut queen_index: HashMap<String, usize> = HashMap::new();
        let mut drone_owner: HashMap<String, String> = HashMap::new();

        for (line_idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| CustomError::ReadWithPath {
                source: e,
                path: path.to_path_buf(),
            })?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 2 {
                return Err(CustomError::PedigreeFields {
                    line_num: line_idx + 1,
                    n_fields: fields.len(),
                });
            }
            let drone = fields[0].to_string();
            let queen = fields[1].to_string();

            if let Some(first) = drone_owner.get(&drone) {
                return Err(CustomError::PedigreeDuplicateDrone {
                    drone,
                    first: first.clone(),
                    second: queen,
                });
            }

            let idx = match queen_index.get(&queen) {
                Some(&idx) => idx,
                None => {
                    families.push(Family {
                        queen: queen.clone(),
                        drones: Vec::new(),
                    });
                    queen_index.insert(queen.clone(), families.len() - 1);
                    families.len() - 1
                }
            };
            drone_owner.insert(drone.clone(), queen);
            families[idx].drones.push(drone);
        }

        if families.is_empty() {
            return Err(CustomError::PedigreeEmpty {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { families })
    }

    pub fn families(&self) -> &[Family] {
        &self.families
    }

    pub fn n_queens(&self) -> usize {
        self.families.len()
    }

    pub fn n_drones(&self) -> usize {
        self.families.iter().map(|f| f.drones.len()).sum()
    }

    /// Resolve each family's drones to VCF sample columns. Drones absent
    /// from the VCF and samples absent from the pedigree are warned about
    /// and excluded; neither is fatal.
    pub fn resolve_columns(&self, samples: &[String]) -> Result<Vec<FamilyColumns>> {
        let mut column_of: HashMap<&str, usize> = HashMap::with_capacity(samples.len());
        for (idx, sample) in samples.iter().enumerate() {
            // First column wins if the header carries duplicates.
            column_of.entry(sample.as_str()).or_insert(idx);
        }

        let mut resolved = Vec::with_capacity(self.families.len());
        for family in &self.families {
            let mut columns = Vec::with_capacity(family.drones.len());
            let mut absent: Vec<&str> = Vec::new();
            for drone in &family.drones {
                match column_of.get(drone.as_str()) {
                    Some(&idx) => columns.push(idx),
                    None => absent.push(drone),
                }
            }
            if !absent.is_empty() {
                eprintln!(
                    "Warning: queen {}: drones absent from the VCF: {}",
                    family.queen,
                    absent.iter().join(", ")
                );
            }
            resolved.push(FamilyColumns {
                queen: family.queen.clone(),
                columns,
            });
        }

        if resolved.iter().all(|f| f.columns.is_empty()) {
            return Err(CustomError::NoInformativeDrones);
        }

        let listed: HashSet<&str> = self
            .families
            .iter()
            .flat_map(|f| f.drones.iter().map(String::as_str))
            .collect();
        let unlisted: Vec<&str> = samples
            .iter()
            .map(String::as_str)
            .filter(|s| !listed.contains(s))
            .collect();
        if !unlisted.is_empty() {
            eprintln!(
                "Warning: VCF samples not in the pedigree are ignored: {}",
                unlisted.iter().join(", ")
            );
        }

        Ok(resolved)
    }
}
