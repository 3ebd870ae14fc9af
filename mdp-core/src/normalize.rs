use crate::coordinate;
use crate::fields::{FieldMap, PFZ_FIELDS};
use crate::record::{scalar_text, RawRecord};
use log::debug;
use mdp_utils::display::PLACEHOLDER;
use serde::Serialize;

/// A record that can be placed on a map.
///
/// `latitude` is within [-90, 90] and `longitude` within [-180, 180].
/// `depth` is `None` when the record has no parseable depth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPoint<'a> {
    pub station: String,
    pub latitude: f64,
    pub longitude: f64,
    pub depth: Option<f64>,
    pub raw: &'a RawRecord,
}

/// Normalize using the default PFZ alias table.
pub fn normalize(raw: &RawRecord) -> Option<NormalizedPoint<'_>> {
    normalize_with(&PFZ_FIELDS, raw)
}

/// Map a raw record onto a [`NormalizedPoint`]; `None` if it is unmappable.
pub fn normalize_with<'a>(fields: &FieldMap, raw: &'a RawRecord) -> Option<NormalizedPoint<'a>> {
    let resolved = fields.resolve(raw);
    let latitude = coordinate::parse_latitude(resolved.latitude)?;
    let longitude = coordinate::parse_longitude(resolved.longitude)?;
    let depth = coordinate::parse_value(resolved.depth);
    let station = station_label(resolved.station);
    Some(NormalizedPoint {
        station,
        latitude,
        longitude,
        depth,
        raw,
    })
}

/// Every mappable record, in input order.
pub fn normalize_all<'a, I>(records: I) -> Vec<NormalizedPoint<'a>>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut total = 0usize;
    let points: Vec<NormalizedPoint<'a>> = records
        .into_iter()
        .inspect(|_| total += 1)
        .filter_map(normalize)
        .collect();
    debug!("normalized {} of {} records", points.len(), total);
    points
}

pub(crate) fn station_label(value: Option<&serde_json::Value>) -> String {
    value
        .and_then(scalar_text)
        .map(|s| s.into_owned())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
