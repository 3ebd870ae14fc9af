//! Projection of records into depth scatter series.

use crate::coordinate;
use crate::fields::{FieldMap, PFZ_FIELDS};
use crate::normalize::station_label;
use crate::record::RawRecord;
use log::debug;
use serde::Serialize;

/// The horizontal axis of a depth scatter.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Longitude,
    Latitude,
}

impl Axis {
    pub fn title(&self) -> &'static str {
        match self {
            Axis::Longitude => "Longitude",
            Axis::Latitude => "Latitude",
        }
    }

    fn short(&self) -> &'static str {
        match self {
            Axis::Longitude => "Lon",
            Axis::Latitude => "Lat",
        }
    }
}

/// One scatter point. `label` names the originating station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
}

/// Project with the default PFZ alias table.
pub fn project<'a, I>(records: I, axis: Axis) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    project_with(&PFZ_FIELDS, records, axis)
}

/// Emit `(axis value, depth)` for every record where both parse.
///
/// Records missing either value are skipped for this series only.
pub fn project_with<'a, I>(fields: &FieldMap, records: I, axis: Axis) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut total = 0usize;
    let points: Vec<SeriesPoint> = records
        .into_iter()
        .filter_map(|record| {
            total += 1;
            let resolved = fields.resolve(record);
            let x = match axis {
                Axis::Longitude => coordinate::parse_longitude(resolved.longitude),
                Axis::Latitude => coordinate::parse_latitude(resolved.latitude),
            }?;
            let y = coordinate::parse_value(resolved.depth)?;
            Some(SeriesPoint {
                x,
                y,
                label: station_label(resolved.station),
            })
        })
        .collect();
    debug!(
        "{}/depth parsed: {} of {}",
        axis.short().to_lowercase(),
        points.len(),
        total
    );
    points
}

/// A chart-ready scatter dataset with titles and tooltip text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub axis: Axis,
    pub x_title: String,
    pub y_title: String,
    pub points: Vec<SeriesPoint>,
    /// Number of records the series was projected from.
    pub source_count: usize,
}

impl ScatterChart {
    pub fn new(axis: Axis, points: Vec<SeriesPoint>, source_count: usize) -> Self {
        Self {
            title: format!("Depth vs {}", axis.title()),
            axis,
            x_title: axis.title().to_string(),
            y_title: "Depth (m)".to_string(),
            points,
            source_count,
        }
    }

    /// Tooltip text for one point, e.g. "Dighi - Lon: 72.9, Depth: 40".
    pub fn tooltip(&self, point: &SeriesPoint) -> String {
        format!(
            "{} - {}: {}, Depth: {}",
            point.label,
            self.axis.short(),
            point.x,
            point.y
        )
    }

    /// "Lon+Depth: 3 / 5" style parse summary.
    pub fn summary(&self) -> String {
        format!(
            "{}+Depth: {} / {}",
            self.axis.short(),
            self.points.len(),
            self.source_count
        )
    }

    /// Message shown instead of the chart when nothing could be plotted.
    pub fn empty_notice(&self) -> Option<String> {
        self.points.is_empty().then(|| {
            format!("No numeric {}+Depth data to plot", self.axis.title())
        })
    }
}
