//! Relative abundance, core microbiome and differential abundance across
//! eDNA samples.
//!
//! Shannon and Chao1 values are opaque inputs carried through to the report;
//! nothing here estimates them.

use anyhow::bail;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Read count for one taxon in one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonCount {
    pub rank: String,
    pub name: String,
    pub count: u64,
}

impl TaxonCount {
    pub fn new(rank: impl Into<String>, name: impl Into<String>, count: u64) -> Self {
        Self {
            rank: rank.into(),
            name: name.into(),
            count,
        }
    }
}

/// The ordered taxon table of one sample. Taxon names are unique and the
/// total read count fits in a `u64`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleTaxonomy {
    sample_id: String,
    taxa: Vec<TaxonCount>,
}

impl SampleTaxonomy {
    pub fn new(sample_id: impl Into<String>, taxa: Vec<TaxonCount>) -> anyhow::Result<Self> {
        let sample_id = sample_id.into();
        let mut seen = HashSet::new();
        for taxon in &taxa {
            if !seen.insert(taxon.name.as_str()) {
                bail!("duplicate taxon {:?} in sample {:?}", taxon.name, sample_id);
            }
        }
        if taxa
            .iter()
            .try_fold(0u64, |total, t| total.checked_add(t.count))
            .is_none()
        {
            bail!("total read count of sample {:?} overflows", sample_id);
        }
        Ok(Self { sample_id, taxa })
    }

    pub fn sample_id(&self) -> &str {
        &self.sample_id
    }

    pub fn taxa(&self) -> &[TaxonCount] {
        &self.taxa
    }

    pub fn total_count(&self) -> u64 {
        self.taxa.iter().map(|t| t.count).sum()
    }

    pub fn count_of(&self, name: &str) -> Option<u64> {
        self.taxa.iter().find(|t| t.name == name).map(|t| t.count)
    }

    /// `100 * count / total` for every taxon. An all-zero sample reports 0 everywhere.
    pub fn relative_abundance(&self) -> Vec<AbundanceRow> {
        let total = self.total_count();
        self.taxa
            .iter()
            .map(|t| AbundanceRow {
                sample_id: self.sample_id.clone(),
                rank: t.rank.clone(),
                phylum: t.name.clone(),
                count: t.count,
                relative_abundance: percent(t.count, total),
            })
            .collect()
    }
}

/// Pre-computed alpha diversity indices for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaDiversity {
    pub shannon: f64,
    pub chao1: f64,
}

/// Display metadata attached to a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMetadata {
    pub sample_id: String,
    pub label: String,
    pub alpha: Option<AlphaDiversity>,
}

/// Samples in iteration order plus their metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    samples: Vec<SampleTaxonomy>,
    metadata: HashMap<String, SampleMetadata>,
}

impl SampleSet {
    pub fn new(
        samples: Vec<SampleTaxonomy>,
        metadata: impl IntoIterator<Item = SampleMetadata>,
    ) -> anyhow::Result<Self> {
        let mut ids = HashSet::new();
        for sample in &samples {
            if !ids.insert(sample.sample_id()) {
                bail!("duplicate sample id {:?}", sample.sample_id());
            }
        }
        let metadata = metadata
            .into_iter()
            .map(|m| (m.sample_id.clone(), m))
            .collect();
        Ok(Self { samples, metadata })
    }

    pub fn samples(&self) -> &[SampleTaxonomy] {
        &self.samples
    }

    pub fn get(&self, sample_id: &str) -> Option<&SampleTaxonomy> {
        self.samples.iter().find(|s| s.sample_id() == sample_id)
    }

    pub fn metadata(&self, sample_id: &str) -> Option<&SampleMetadata> {
        self.metadata.get(sample_id)
    }

    /// Human label for a sample, falling back to its id.
    pub fn label<'a>(&'a self, sample_id: &'a str) -> &'a str {
        self.metadata
            .get(sample_id)
            .map(|m| m.label.as_str())
            .unwrap_or(sample_id)
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One taxon's share of a sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbundanceRow {
    pub sample_id: String,
    pub rank: String,
    pub phylum: String,
    pub count: u64,
    pub relative_abundance: f64,
}

/// Composition of a single sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleAbundance {
    pub sample_id: String,
    pub label: String,
    pub total_count: u64,
    pub rows: Vec<AbundanceRow>,
}

/// Relative abundance of every taxon (columns) in every sample (rows).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferentialMatrix {
    /// Union of taxon names in first-seen order.
    pub taxa: Vec<String>,
    pub rows: Vec<DifferentialRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferentialRow {
    pub sample_id: String,
    pub values: Vec<f64>,
}

impl DifferentialMatrix {
    pub fn value(&self, sample_id: &str, taxon: &str) -> Option<f64> {
        let column = self.taxa.iter().position(|t| t == taxon)?;
        self.rows
            .iter()
            .find(|r| r.sample_id == sample_id)
            .map(|r| r.values[column])
    }
}

/// Alpha diversity row passed through from the sample metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlphaRow {
    pub sample_id: String,
    pub label: String,
    pub shannon: f64,
    pub chao1: f64,
}

/// Everything the eDNA dashboard shows for a sample set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityReport {
    pub per_sample_abundance: Vec<SampleAbundance>,
    pub core_microbiome: Vec<String>,
    pub differential_matrix: DifferentialMatrix,
    pub alpha_diversity: Vec<AlphaRow>,
}

impl DiversityReport {
    pub fn sample(&self, sample_id: &str) -> Option<&SampleAbundance> {
        self.per_sample_abundance
            .iter()
            .find(|s| s.sample_id == sample_id)
    }
}

/// Build the full report for `set`.
pub fn aggregate(set: &SampleSet) -> DiversityReport {
    let per_sample_abundance: Vec<SampleAbundance> = set
        .samples()
        .iter()
        .map(|sample| SampleAbundance {
            sample_id: sample.sample_id().to_string(),
            label: set.label(sample.sample_id()).to_string(),
            total_count: sample.total_count(),
            rows: sample.relative_abundance(),
        })
        .collect();
    let core = core_microbiome(set.samples());
    let differential_matrix = differential_matrix(set.samples());
    let alpha_diversity = set
        .samples()
        .iter()
        .filter_map(|sample| {
            let meta = set.metadata(sample.sample_id())?;
            let alpha = meta.alpha?;
            Some(AlphaRow {
                sample_id: meta.sample_id.clone(),
                label: meta.label.clone(),
                shannon: alpha.shannon,
                chao1: alpha.chao1,
            })
        })
        .collect();
    debug!(
        "aggregated {} samples: {} core taxa of {}",
        per_sample_abundance.len(),
        core.len(),
        differential_matrix.taxa.len()
    );
    DiversityReport {
        per_sample_abundance,
        core_microbiome: core,
        differential_matrix,
        alpha_diversity,
    }
}

/// Taxon names present in every sample, in the first sample's order.
pub fn core_microbiome(samples: &[SampleTaxonomy]) -> Vec<String> {
    let Some((first, rest)) = samples.split_first() else {
        return Vec::new();
    };
    let others: Vec<HashSet<&str>> = rest
        .iter()
        .map(|s| s.taxa().iter().map(|t| t.name.as_str()).collect())
        .collect();
    first
        .taxa()
        .iter()
        .filter(|t| others.iter().all(|set| set.contains(t.name.as_str())))
        .map(|t| t.name.clone())
        .collect()
}

/// One row per sample over the union of taxa; absent taxa contribute 0.
pub fn differential_matrix(samples: &[SampleTaxonomy]) -> DifferentialMatrix {
    let mut taxa: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for taxon in samples.iter().flat_map(|s| s.taxa()) {
        if seen.insert(taxon.name.as_str()) {
            taxa.push(taxon.name.clone());
        }
    }
    let rows = samples
        .iter()
        .map(|sample| {
            let total = sample.total_count();
            let values = taxa
                .iter()
                .map(|name| sample.count_of(name).map_or(0.0, |c| percent(c, total)))
                .collect();
            DifferentialRow {
                sample_id: sample.sample_id().to_string(),
                values,
            }
        })
        .collect();
    DifferentialMatrix { taxa, rows }
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}
