//! The full derivation chain for one view of a record set.
//!
//! `raw -> filtered -> {points, series, table, export}`. Every output is a
//! pure function of the loaded records and the query; hosts rebuild the view
//! whenever either changes.

use crate::export::to_delimited;
use crate::filter::filter;
use crate::map::{MapConfig, MapLayer};
use crate::normalize::{normalize_all, NormalizedPoint};
use crate::record::RawRecord;
use crate::series::{project, Axis, ScatterChart};
use crate::table::{empty_table_notice, table_rows, TableRow};

/// Derived state for one `(records, query)` pair.
#[derive(Debug, Clone)]
pub struct PfzView<'a> {
    pub loaded: usize,
    pub filtered: Vec<&'a RawRecord>,
    pub points: Vec<NormalizedPoint<'a>>,
    pub lon_depth: ScatterChart,
    pub lat_depth: ScatterChart,
    pub table: Vec<TableRow>,
}

impl<'a> PfzView<'a> {
    pub fn build(records: &'a [RawRecord], query: &str) -> Self {
        let filtered = filter(records, query);
        let points = normalize_all(filtered.iter().copied());
        let lon_depth = ScatterChart::new(
            Axis::Longitude,
            project(filtered.iter().copied(), Axis::Longitude),
            filtered.len(),
        );
        let lat_depth = ScatterChart::new(
            Axis::Latitude,
            project(filtered.iter().copied(), Axis::Latitude),
            filtered.len(),
        );
        let table = table_rows(filtered.iter().copied());
        PfzView {
            loaded: records.len(),
            filtered,
            points,
            lon_depth,
            lat_depth,
            table,
        }
    }

    /// Map markers and bounds for the filtered, mappable records.
    pub fn map_layer(&self, config: MapConfig) -> MapLayer {
        MapLayer::build(config, &self.points)
    }

    /// CSV bytes of the filtered records.
    pub fn export(&self) -> Vec<u8> {
        to_delimited(self.filtered.iter().copied())
    }

    pub fn table_notice(&self) -> Option<&'static str> {
        empty_table_notice(self.loaded, self.filtered.len())
    }

    /// "Lon+Depth: 3 / 5 · Lat+Depth: 4 / 5"
    pub fn parse_summary(&self) -> String {
        format!("{} · {}", self.lon_depth.summary(), self.lat_depth.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::FallbackSource;
    use serde_json::json;

    #[test]
    fn test_unmappable_record_stays_in_table_and_export() {
        let records: Vec<RawRecord> = vec![
            json!({"Station": "Dighi", "Depth": "40", "Latitude": 18.1, "Longitude": 72.9}),
            json!({"Station": "Nowhere", "Depth": "12", "Longitude": 73.0}),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();

        let view = PfzView::build(&records, "");
        assert_eq!(view.points.len(), 1);
        assert_eq!(view.table.len(), 2);
        assert_eq!(view.table[1].latitude, "-");

        let csv = String::from_utf8(view.export()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Station,Depth,Latitude,Longitude");
        assert_eq!(lines[2], "Nowhere,12,,73.0");
    }

    #[test]
    fn test_query_narrows_every_output() {
        let source = FallbackSource::embedded().unwrap();
        let records = source.lookup("maharashtra");
        let view = PfzView::build(&records, "dighi");
        assert_eq!(view.filtered.len(), 1);
        assert_eq!(view.points.len(), 1);
        assert_eq!(view.table.len(), 1);
        assert_eq!(view.lon_depth.points.len(), 1);
        assert_eq!(view.table_notice(), None);

        let none = PfzView::build(&records, "zzz");
        assert_eq!(none.table_notice(), Some("No results for your filter"));
        assert!(none.export().is_empty());
        assert!(none.map_layer(MapConfig::default()).fit_bounds.is_none());
    }

    #[test]
    fn test_parse_summary() {
        let source = FallbackSource::embedded().unwrap();
        let records = source.lookup("kerala");
        let view = PfzView::build(&records, "");
        assert_eq!(view.parse_summary(), "Lon+Depth: 4 / 4 · Lat+Depth: 3 / 4");
    }
}
