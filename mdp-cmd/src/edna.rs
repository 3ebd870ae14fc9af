//! eDNA sample summary.

use crate::write_json;
use log::info;
use mdp_data::diversity::{aggregate, DiversityReport, SampleAbundance};
use mdp_data::samples::{FeatureTableFiles, SampleSource, StaticSamples};
use std::path::PathBuf;

/// Aggregate the chosen samples and print the dashboard sections.
///
/// Without a feature table the built-in demonstration samples are used.
pub fn run_edna(
    feature_table: Option<&str>,
    metadata: Option<&str>,
    sample: Option<&str>,
    json: Option<&str>,
) -> anyhow::Result<()> {
    let set = match feature_table {
        Some(path) => FeatureTableFiles {
            feature_table: PathBuf::from(path),
            metadata: metadata.map(PathBuf::from),
        }
        .load()?,
        None => StaticSamples.load()?,
    };
    if set.is_empty() {
        anyhow::bail!("No samples found");
    }
    let report = aggregate(&set);
    info!("Aggregated {} samples", report.per_sample_abundance.len());

    match sample {
        Some(id) => {
            let abundance = report
                .sample(id)
                .ok_or_else(|| anyhow::anyhow!("Unknown sample {:?}", id))?;
            print!("{}", render_composition(abundance));
        }
        None => print!("{}", render_report(&report)),
    }

    if let Some(path) = json {
        write_json(path, &report)?;
    }
    Ok(())
}

/// Relative abundance of each taxon in one sample.
pub fn render_composition(sample: &SampleAbundance) -> String {
    let mut out = format!(
        "Relative abundance in {} ({}, {} reads)\n",
        sample.sample_id, sample.label, sample.total_count
    );
    for row in &sample.rows {
        out.push_str(&format!(
            "  {:<20} {:>8} {:>6.2}%\n",
            row.phylum, row.count, row.relative_abundance
        ));
    }
    out
}

/// Every section of the report as plain text.
pub fn render_report(report: &DiversityReport) -> String {
    let mut out = String::new();
    for sample in &report.per_sample_abundance {
        out.push_str(&render_composition(sample));
    }

    out.push_str("\nCore microbiome (present in all samples)\n");
    if report.core_microbiome.is_empty() {
        out.push_str("  (none)\n");
    }
    for taxon in &report.core_microbiome {
        out.push_str(&format!("  - {}\n", taxon));
    }

    if !report.alpha_diversity.is_empty() {
        out.push_str("\nAlpha diversity\n");
        out.push_str(&format!("  {:<10} {:>8} {:>8}\n", "Sample", "Shannon", "Chao1"));
        for row in &report.alpha_diversity {
            out.push_str(&format!(
                "  {:<10} {:>8} {:>8}\n",
                row.sample_id, row.shannon, row.chao1
            ));
        }
    }

    let matrix = &report.differential_matrix;
    out.push_str("\nDifferential abundance (%)\n");
    out.push_str(&format!("  {:<20}", "Taxon"));
    for row in &matrix.rows {
        out.push_str(&format!(" {:>10}", row.sample_id));
    }
    out.push('\n');
    for (column, taxon) in matrix.taxa.iter().enumerate() {
        out.push_str(&format!("  {:<20}", taxon));
        for row in &matrix.rows {
            out.push_str(&format!(" {:>10.2}", row.values[column]));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_static_report() {
        let report = aggregate(&StaticSamples.load().unwrap());
        let text = render_report(&report);
        assert!(text.contains("Core microbiome"));
        assert!(text.contains("  - Proteobacteria\n"));
        assert!(text.contains("Marinimicrobia"));
        assert!(text.contains("sample3"));
    }

    #[test]
    fn test_render_composition() {
        let report = aggregate(&StaticSamples.load().unwrap());
        let text = render_composition(report.sample("sample1").unwrap());
        assert!(text.starts_with("Relative abundance in sample1 (Water Sample (River Ganga), 10050 reads)"));
        assert!(text.contains("Proteobacteria"));
        assert!(text.contains("44.78%"));
    }

    #[test]
    fn test_unknown_sample_is_an_error() {
        assert!(run_edna(None, None, Some("sample9"), None).is_err());
    }
}
