//! Analytics for the eDNA and oceanography views.
//!
//! - `diversity`: per-sample relative abundance, core microbiome and the
//!   differential abundance matrix
//! - `samples`: injectable sources for sample tables
//! - `sst`: sea surface temperature readings to coloured grid cells

pub mod diversity;
pub mod samples;

/// Sea surface temperature grid processing
pub mod sst {
    use serde::{Deserialize, Serialize};

    /// One gridded SST reading in °C.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct SstReading {
        pub lat: f64,
        pub lon: f64,
        pub sst: f64,
    }

    /// Viewport lock and colour scale for the SST map.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct SstMapConfig {
        pub lat_min: f64,
        pub lat_max: f64,
        pub lon_min: f64,
        pub lon_max: f64,
        /// Temperature drawn as pure blue.
        pub sst_min: f64,
        /// Temperature drawn as pure red.
        pub sst_max: f64,
        /// Cell size used when the grid spacing cannot be detected.
        pub default_step: f64,
    }

    impl Default for SstMapConfig {
        fn default() -> Self {
            Self {
                lat_min: -14.0,
                lat_max: 30.0,
                lon_min: 50.0,
                lon_max: 100.0,
                sst_min: 25.0,
                sst_max: 35.0,
                default_step: 0.25,
            }
        }
    }

    impl SstMapConfig {
        /// Map center as `[lat, lon]`.
        pub fn center(&self) -> [f64; 2] {
            [
                (self.lat_min + self.lat_max) / 2.0,
                (self.lon_min + self.lon_max) / 2.0,
            ]
        }

        /// `hsl(hue, 100%, 50%)` running from blue (cold) to red (warm).
        ///
        /// Temperatures outside the scale are clamped to its ends. A zero-width
        /// scale draws everything blue.
        pub fn color(&self, sst: f64) -> String {
            let span = self.sst_max - self.sst_min;
            let ratio = if span > 0.0 {
                ((sst - self.sst_min) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let hue = (1.0 - ratio) * 240.0;
            format!("hsl({:.1}, 100%, 50%)", hue)
        }
    }

    /// A filled rectangle centred on one reading.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct SstCell {
        /// `[[south, west], [north, east]]`
        pub bounds: [[f64; 2]; 2],
        pub color: String,
        pub sst: f64,
        pub tooltip: String,
    }

    /// Spacing between the two smallest distinct values, or `default` if
    /// fewer than two distinct values exist.
    pub fn grid_step(values: impl IntoIterator<Item = f64>, default: f64) -> f64 {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup();
        match sorted.as_slice() {
            [a, b, ..] => b - a,
            _ => default,
        }
    }

    /// Build one cell per finite reading.
    pub fn build_cells(readings: &[SstReading], config: &SstMapConfig) -> Vec<SstCell> {
        let readings: Vec<&SstReading> = readings
            .iter()
            .filter(|r| r.lat.is_finite() && r.lon.is_finite() && r.sst.is_finite())
            .collect();
        let lat_step = grid_step(readings.iter().map(|r| r.lat), config.default_step);
        let lon_step = grid_step(readings.iter().map(|r| r.lon), config.default_step);
        readings
            .into_iter()
            .map(|r| SstCell {
                bounds: [
                    [r.lat - lat_step / 2.0, r.lon - lon_step / 2.0],
                    [r.lat + lat_step / 2.0, r.lon + lon_step / 2.0],
                ],
                color: config.color(r.sst),
                sst: r.sst,
                tooltip: format!("SST: {:.2}°C", r.sst),
            })
            .collect()
    }

    /// Parse a JSON array of `{lat, lon, sst}` objects.
    pub fn readings_from_json(json: &str) -> anyhow::Result<Vec<SstReading>> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_grid_step() {
            assert_eq!(grid_step(vec![10.5, 10.0, 10.25, 10.0], 0.25), 0.25);
            assert_eq!(grid_step(vec![3.0], 0.25), 0.25);
            assert_eq!(grid_step(Vec::new(), 0.5), 0.5);
        }

        #[test]
        fn test_color_scale() {
            let config = SstMapConfig::default();
            assert_eq!(config.color(25.0), "hsl(240.0, 100%, 50%)");
            assert_eq!(config.color(30.0), "hsl(120.0, 100%, 50%)");
            assert_eq!(config.color(35.0), "hsl(0.0, 100%, 50%)");
            assert_eq!(config.color(40.0), "hsl(0.0, 100%, 50%)");
        }

        #[test]
        fn test_cells_from_fixture() {
            let readings =
                readings_from_json(include_str!("../../fixtures/sst_sample.json")).unwrap();
            let cells = build_cells(&readings, &SstMapConfig::default());
            assert_eq!(cells.len(), 5);
            assert_eq!(cells[0].bounds, [[9.875, 69.875], [10.125, 70.125]]);
            assert_eq!(cells[0].tooltip, "SST: 28.40°C");
        }

        #[test]
        fn test_flat_scale_is_blue() {
            let config = SstMapConfig {
                sst_min: 28.0,
                sst_max: 28.0,
                ..SstMapConfig::default()
            };
            assert_eq!(config.color(28.0), "hsl(240.0, 100%, 50%)");
            assert_eq!(config.color(31.0), "hsl(240.0, 100%, 50%)");
        }

        #[test]
        fn test_center() {
            assert_eq!(SstMapConfig::default().center(), [8.0, 75.0]);
        }
    }
}
