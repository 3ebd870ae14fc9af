//! Marker and viewport data for the station map.
//!
//! The map widget itself lives outside this crate. It is constructed from a
//! [`MapConfig`] value and fed [`Marker`]s and a [`Bounds`] rectangle.

use crate::fields::PFZ_FIELDS;
use crate::normalize::NormalizedPoint;
use crate::record::scalar_text;
use mdp_utils::display::{format_coordinate, or_placeholder};
use serde::{Deserialize, Serialize};

/// Marker icon assets and geometry, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub icon_url: String,
    pub icon_retina_url: String,
    pub shadow_url: String,
    pub icon_size: [u32; 2],
    pub icon_anchor: [u32; 2],
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            icon_url: "https://unpkg.com/leaflet@1.9.3/dist/images/marker-icon.png".to_string(),
            icon_retina_url: "https://unpkg.com/leaflet@1.9.3/dist/images/marker-icon-2x.png"
                .to_string(),
            shadow_url: "https://unpkg.com/leaflet@1.9.3/dist/images/marker-shadow.png"
                .to_string(),
            icon_size: [25, 41],
            icon_anchor: [12, 41],
        }
    }
}

/// Construction-time settings for the map collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial center as `[lat, lon]`.
    pub center: [f64; 2],
    pub zoom: u8,
    pub tile_url: String,
    pub marker_icon: MarkerIcon,
    /// Padding in pixels applied when fitting the view to the markers.
    pub fit_padding: [u32; 2],
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [20.0, 78.0],
            zoom: 5,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            marker_icon: MarkerIcon::default(),
            fit_padding: [30, 30],
        }
    }
}

/// A single map marker with its popup text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: [f64; 2],
    pub title: String,
    pub popup: Vec<String>,
}

/// Axis-aligned lat/lon rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest rectangle containing every point; `None` for no points.
    pub fn enclosing(points: &[NormalizedPoint<'_>]) -> Option<Bounds> {
        let first = points.first()?;
        let init = Bounds {
            south: first.latitude,
            west: first.longitude,
            north: first.latitude,
            east: first.longitude,
        };
        Some(points.iter().skip(1).fold(init, |b, p| Bounds {
            south: b.south.min(p.latitude),
            west: b.west.min(p.longitude),
            north: b.north.max(p.latitude),
            east: b.east.max(p.longitude),
        }))
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }
}

/// Everything the map widget needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub config: MapConfig,
    pub markers: Vec<Marker>,
    pub fit_bounds: Option<Bounds>,
}

impl MapLayer {
    pub fn build(config: MapConfig, points: &[NormalizedPoint<'_>]) -> Self {
        let markers = points.iter().map(marker_for).collect();
        MapLayer {
            config,
            markers,
            fit_bounds: Bounds::enclosing(points),
        }
    }
}

fn marker_for(point: &NormalizedPoint<'_>) -> Marker {
    let depth = PFZ_FIELDS.depth.resolve(point.raw).and_then(scalar_text);
    Marker {
        position: [point.latitude, point.longitude],
        title: point.station.clone(),
        popup: vec![
            point.station.clone(),
            format!("Depth: {}", or_placeholder(depth.as_deref())),
            format!("Lat: {}", format_coordinate(Some(point.latitude))),
            format!("Lon: {}", format_coordinate(Some(point.longitude))),
        ],
    }
}
