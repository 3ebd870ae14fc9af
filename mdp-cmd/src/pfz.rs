//! PFZ fetch, filter and export.

use crate::write_json;
use log::info;
use mdp_core::config::PortalConfig;
use mdp_core::error::FetchError;
use mdp_core::fallback::FallbackSource;
use mdp_core::fetch::{FetchState, HttpSource, PfzSession};
use mdp_core::map::MapConfig;
use mdp_core::pipeline::PfzView;
use mdp_core::table::{TableRow, TABLE_HEADERS};
use std::time::Duration;

/// Options for one `pfz` invocation.
#[derive(Debug, Clone)]
pub struct PfzOptions {
    pub state: String,
    pub query: String,
    pub offline: bool,
    pub api_base: String,
    pub timeout_secs: u64,
    pub csv: Option<String>,
    pub series: Option<String>,
    pub map: Option<String>,
}

/// Load records for the requested state, then print and export the view.
pub async fn run_pfz(options: &PfzOptions) -> anyhow::Result<()> {
    if options.state.trim().is_empty() {
        anyhow::bail!("{}", FetchError::MissingState);
    }

    let mut session = PfzSession::new();
    if options.offline || options.api_base.is_empty() {
        if !options.offline {
            info!("No API base configured; using the embedded fallback table");
        }
        let source = FallbackSource::embedded()?;
        session.load(&source, &options.state).await;
    } else {
        let mut config = PortalConfig::new(options.api_base.as_str());
        if options.timeout_secs > 0 {
            config = config.with_timeout(Duration::from_secs(options.timeout_secs));
        }
        let source = HttpSource::new(config)?;
        session.load(&source, &options.state).await;
    }

    if let FetchState::Error { message } = session.state() {
        anyhow::bail!("{}", message);
    }
    if let Some(notice) = session.notice() {
        println!("{}", notice);
        return Ok(());
    }

    let view = PfzView::build(session.records(), &options.query);
    println!("{}", view.parse_summary());
    for chart in [&view.lon_depth, &view.lat_depth] {
        if let Some(notice) = chart.empty_notice() {
            println!("{}", notice);
        }
    }
    match view.table_notice() {
        Some(notice) => println!("{}", notice),
        None => print!("{}", render_table(&view.table)),
    }

    if let Some(path) = &options.csv {
        let bytes = view.export();
        if bytes.is_empty() {
            info!("No records to export; {} not written", path);
        } else {
            std::fs::write(path, &bytes)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
            info!("Wrote {} records to {}", view.filtered.len(), path);
        }
    }
    if let Some(path) = &options.series {
        write_json(path, &[&view.lon_depth, &view.lat_depth])?;
    }
    if let Some(path) = &options.map {
        write_json(path, &view.map_layer(MapConfig::default()))?;
    }
    Ok(())
}

/// Left-aligned plain-text table with a header rule.
pub fn render_table(rows: &[TableRow]) -> String {
    let mut widths = TABLE_HEADERS.map(str::len);
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.cells()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let line = |cells: [&str; 4]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };
    let mut out = line(TABLE_HEADERS);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("{}\n", rule.join("  ")));
    for row in rows {
        out.push_str(&line(row.cells()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn options(state: &str, query: &str) -> PfzOptions {
        PfzOptions {
            state: state.to_string(),
            query: query.to_string(),
            offline: true,
            api_base: String::new(),
            timeout_secs: 0,
            csv: None,
            series: None,
            map: None,
        }
    }

    #[test]
    fn test_render_table() {
        let rows = vec![TableRow {
            station: "Dighi".into(),
            depth: "40".into(),
            latitude: "18.140000".into(),
            longitude: "72.985000".into(),
        }];
        let text = render_table(&rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Station  Depth  Latitude"));
        assert!(lines[2].starts_with("Dighi    40     18.140000"));
    }

    #[tokio::test]
    async fn test_blank_state_is_an_error() {
        let err = run_pfz(&options(" ", "")).await.unwrap_err();
        assert_eq!(err.to_string(), "Enter a state or station name");
    }

    #[tokio::test]
    async fn test_offline_run_succeeds() {
        assert!(run_pfz(&options("goa", "")).await.is_ok());
        assert!(run_pfz(&options("atlantis", "")).await.is_ok());
    }

    #[tokio::test]
    async fn test_csv_and_json_written() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("goa.csv");
        let map_path = dir.path().join("map.json");
        let mut opts = options("goa", "");
        opts.csv = Some(csv_path.to_string_lossy().into_owned());
        opts.map = Some(map_path.to_string_lossy().into_owned());
        run_pfz(&opts).await.unwrap();

        let text = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Station,Depth,Latitude,Longitude");
        assert!(lines[1].starts_with("Panaji,28,"));
        assert!(!text.ends_with('\n'));

        let map: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&map_path).unwrap()).unwrap();
        assert_eq!(map["markers"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_csv_skipped_when_nothing_matches() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("none.csv");
        let mut opts = options("goa", "zzz");
        opts.csv = Some(csv_path.to_string_lossy().into_owned());
        run_pfz(&opts).await.unwrap();
        assert!(!csv_path.exists());
    }
}
