//! Command implementations for the marine data portal CLI.
//!
//! Provides subcommands for fetching and exporting PFZ station data,
//! summarising eDNA samples and gridding SST readings.

use clap::Subcommand;
use mdp_core::export::DEFAULT_FILENAME;
use std::path::Path;

pub mod edna;
pub mod pfz;
pub mod sst;

#[derive(Subcommand)]
pub enum Command {
    /// Fetch Potential Fishing Zone records for a state and derive table, charts and CSV
    Pfz {
        /// State or station name sent to the API (e.g. "maharashtra")
        #[arg(short = 's', long)]
        state: String,

        /// Case-insensitive filter on station name or depth
        #[arg(short = 'q', long, default_value = "")]
        query: String,

        /// Use the embedded fallback table instead of the API
        #[arg(long)]
        offline: bool,

        /// API base URL; `/api/pfz` is appended
        #[arg(long, env = "MDP_API_BASE", default_value = "")]
        api_base: String,

        /// Request timeout in seconds (0 disables it)
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,

        /// Write the filtered records as CSV
        #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_FILENAME)]
        csv: Option<String>,

        /// Write both depth scatter series as JSON
        #[arg(long)]
        series: Option<String>,

        /// Write map markers and fit bounds as JSON
        #[arg(long)]
        map: Option<String>,
    },

    /// Summarise eDNA samples: composition, core microbiome, differential abundance
    Edna {
        /// Long-format feature table CSV (sample_id,rank,name,count)
        #[arg(short = 'f', long)]
        feature_table: Option<String>,

        /// Sample metadata CSV (sample_id,label,shannon,chao1)
        #[arg(short = 'm', long, requires = "feature_table")]
        metadata: Option<String>,

        /// Only print the composition of this sample
        #[arg(long)]
        sample: Option<String>,

        /// Write the full report as JSON
        #[arg(long)]
        json: Option<String>,
    },

    /// Convert gridded SST readings into coloured map cells
    Sst {
        /// JSON array of {lat, lon, sst} objects
        #[arg(short = 'i', long)]
        input: String,

        /// Write the cells as JSON
        #[arg(long)]
        json: Option<String>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Pfz {
            state,
            query,
            offline,
            api_base,
            timeout_secs,
            csv,
            series,
            map,
        } => {
            let options = pfz::PfzOptions {
                state,
                query,
                offline,
                api_base,
                timeout_secs,
                csv,
                series,
                map,
            };
            pfz::run_pfz(&options).await
        }
        Command::Edna {
            feature_table,
            metadata,
            sample,
            json,
        } => edna::run_edna(
            feature_table.as_deref(),
            metadata.as_deref(),
            sample.as_deref(),
            json.as_deref(),
        ),
        Command::Sst { input, json } => sst::run_sst(&input, json.as_deref()),
    }
}

/// Serialize `value` as pretty JSON into `path`.
pub(crate) fn write_json<T: serde::Serialize>(path: &str, value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(Path::new(path), text)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
    log::info!("Wrote {}", path);
    Ok(())
}
