//! Sources of eDNA sample tables.
//!
//! A sequencing pipeline typically exports a long-format feature table
//! (`sample_id,rank,name,count`); sample labels and pre-computed alpha
//! diversity come from a separate metadata table
//! (`sample_id,label,shannon,chao1`).

use crate::diversity::{AlphaDiversity, SampleMetadata, SampleSet, SampleTaxonomy, TaxonCount};
use anyhow::Context;
use csv::ReaderBuilder;
use log::info;
use serde::Deserialize;
use std::path::PathBuf;

/// Embedded feature table for the three demonstration samples.
pub static FEATURE_TABLE_CSV: &str = include_str!("../../fixtures/edna_feature_table.csv");

/// Embedded labels and alpha diversity for the demonstration samples.
pub static SAMPLE_METADATA_CSV: &str = include_str!("../../fixtures/edna_samples.csv");

/// Anything that can provide a set of samples to aggregate.
pub trait SampleSource {
    fn load(&self) -> anyhow::Result<SampleSet>;
}

/// The built-in demonstration samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSamples;

impl SampleSource for StaticSamples {
    fn load(&self) -> anyhow::Result<SampleSet> {
        let samples = parse_feature_table(FEATURE_TABLE_CSV)?;
        let metadata = parse_sample_metadata(SAMPLE_METADATA_CSV)?;
        SampleSet::new(samples, metadata)
    }
}

/// Feature table and optional metadata read from disk.
#[derive(Debug, Clone)]
pub struct FeatureTableFiles {
    pub feature_table: PathBuf,
    pub metadata: Option<PathBuf>,
}

impl SampleSource for FeatureTableFiles {
    fn load(&self) -> anyhow::Result<SampleSet> {
        let table = std::fs::read_to_string(&self.feature_table)
            .with_context(|| format!("reading {}", self.feature_table.display()))?;
        let samples = parse_feature_table(&table)
            .with_context(|| format!("parsing {}", self.feature_table.display()))?;
        let metadata = match &self.metadata {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                parse_sample_metadata(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => Vec::new(),
        };
        info!(
            "loaded {} samples from {}",
            samples.len(),
            self.feature_table.display()
        );
        SampleSet::new(samples, metadata)
    }
}

#[derive(Debug, Deserialize)]
struct FeatureRow {
    sample_id: String,
    rank: String,
    name: String,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct MetadataRow {
    sample_id: String,
    label: String,
    shannon: Option<f64>,
    chao1: Option<f64>,
}

/// Group feature rows into samples, keeping first-seen sample and taxon order.
pub fn parse_feature_table(csv_object: &str) -> anyhow::Result<Vec<SampleTaxonomy>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_object.as_bytes());
    let mut grouped: Vec<(String, Vec<TaxonCount>)> = Vec::new();
    for (line, row) in rdr.deserialize::<FeatureRow>().enumerate() {
        let row = row.with_context(|| format!("feature table row {}", line + 1))?;
        let taxon = TaxonCount::new(row.rank, row.name, row.count);
        match grouped.iter_mut().find(|(id, _)| *id == row.sample_id) {
            Some((_, taxa)) => taxa.push(taxon),
            None => grouped.push((row.sample_id, vec![taxon])),
        }
    }
    grouped
        .into_iter()
        .map(|(id, taxa)| SampleTaxonomy::new(id, taxa))
        .collect()
}

/// Parse sample labels; alpha diversity is kept only when both indices are present.
pub fn parse_sample_metadata(csv_object: &str) -> anyhow::Result<Vec<SampleMetadata>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_object.as_bytes());
    let mut metadata = Vec::new();
    for row in rdr.deserialize::<MetadataRow>() {
        let row = row?;
        let alpha = match (row.shannon, row.chao1) {
            (Some(shannon), Some(chao1)) => Some(AlphaDiversity { shannon, chao1 }),
            _ => None,
        };
        metadata.push(SampleMetadata {
            sample_id: row.sample_id,
            label: row.label,
            alpha,
        });
    }
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diversity::aggregate;
    use std::fs;
    use tempfile::tempdir;

    const TABLE: &str = "\
sample_id,rank,name,count
river,Phylum,Proteobacteria,30
river,Phylum,Firmicutes,10
reef,Phylum,Proteobacteria,5
";

    #[test]
    fn test_static_samples() {
        let set = StaticSamples.load().unwrap();
        assert_eq!(set.samples().len(), 3);
        assert_eq!(set.label("sample1"), "Water Sample (River Ganga)");
        assert_eq!(set.get("sample1").unwrap().total_count(), 10050);
    }

    #[test]
    fn test_static_report() {
        let report = aggregate(&StaticSamples.load().unwrap());
        assert_eq!(
            report.core_microbiome,
            vec!["Proteobacteria", "Actinobacteria", "Bacteroidetes"]
        );
        assert_eq!(report.differential_matrix.taxa.len(), 7);
        assert_eq!(report.alpha_diversity.len(), 3);
        assert_eq!(report.alpha_diversity[2].chao1, 180.0);
    }

    #[test]
    fn test_feature_table_groups_in_order() {
        let csv_data = "\
sample_id,rank,name,count
b,Phylum,X,1
a,Phylum,Y,2
b,Phylum,Z,3
";
        let samples = parse_feature_table(csv_data).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].sample_id(), "b");
        assert_eq!(samples[0].taxa().len(), 2);
        assert_eq!(samples[1].taxa()[0].name, "Y");
    }

    #[test]
    fn test_feature_table_rejects_bad_count() {
        let csv_data = "sample_id,rank,name,count\ns,Phylum,X,many\n";
        assert!(parse_feature_table(csv_data).is_err());
    }

    #[test]
    fn test_metadata_without_indices() {
        let csv_data = "sample_id,label,shannon,chao1\ns1,River,,\n";
        let metadata = parse_sample_metadata(csv_data).unwrap();
        assert_eq!(metadata[0].label, "River");
        assert_eq!(metadata[0].alpha, None);
    }

    #[test]
    fn test_files_with_metadata() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("features.csv");
        let meta = dir.path().join("samples.csv");
        fs::write(&table, TABLE).unwrap();
        fs::write(&meta, "sample_id,label,shannon,chao1\nriver,Ganga,2.5,90\n").unwrap();

        let set = FeatureTableFiles {
            feature_table: table,
            metadata: Some(meta),
        }
        .load()
        .unwrap();
        assert_eq!(set.samples().len(), 2);
        assert_eq!(set.get("river").unwrap().total_count(), 40);
        assert_eq!(set.label("river"), "Ganga");
        assert_eq!(set.label("reef"), "reef");
        let report = aggregate(&set);
        assert_eq!(report.core_microbiome, vec!["Proteobacteria"]);
        assert_eq!(report.alpha_diversity.len(), 1);
    }

    #[test]
    fn test_files_without_metadata() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("features.csv");
        fs::write(&table, TABLE).unwrap();

        let set = FeatureTableFiles {
            feature_table: table,
            metadata: None,
        }
        .load()
        .unwrap();
        assert_eq!(set.samples().len(), 2);
        assert!(set.metadata("river").is_none());
        assert!(aggregate(&set).alpha_diversity.is_empty());
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("absent.csv");
        let err = FeatureTableFiles {
            feature_table: table.clone(),
            metadata: None,
        }
        .load()
        .unwrap_err();
        assert_eq!(err.to_string(), format!("reading {}", table.display()));
    }

    #[test]
    fn test_malformed_file_names_the_path() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("features.csv");
        fs::write(&table, "sample_id,rank,name,count\nriver,Phylum,X,lots\n").unwrap();
        let err = FeatureTableFiles {
            feature_table: table.clone(),
            metadata: None,
        }
        .load()
        .unwrap_err();
        assert_eq!(err.to_string(), format!("parsing {}", table.display()));
    }

    #[test]
    fn test_duplicate_taxon_in_file_rejected() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("features.csv");
        fs::write(
            &table,
            "sample_id,rank,name,count\nriver,Phylum,X,1\nriver,Phylum,X,2\n",
        )
        .unwrap();
        let err = FeatureTableFiles {
            feature_table: table,
            metadata: None,
        }
        .load()
        .unwrap_err();
        assert!(format!("{:#}", err).contains("duplicate taxon \"X\""));
    }
}
