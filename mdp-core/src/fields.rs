//! Declarative key aliases for the logical fields of a PFZ record.
//!
//! Sources disagree on key names ("Latitude", "lat", "Lat", ...). Each logical
//! field lists its accepted keys in priority order; resolution tries every
//! alias exactly first and then each alias lower-cased. A key present with a
//! `null` value counts as absent.

use crate::record::RawRecord;
use serde_json::Value;

/// Accepted keys for one logical field, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldAliases {
    pub name: &'static str,
    pub keys: &'static [&'static str],
}

impl FieldAliases {
    /// First non-null value among the aliases.
    pub fn resolve<'a>(&self, record: &'a RawRecord) -> Option<&'a Value> {
        self.keys
            .iter()
            .find_map(|key| non_null(record.get(key)))
            .or_else(|| {
                self.keys
                    .iter()
                    .find_map(|key| non_null(record.get(&key.to_lowercase())))
            })
    }
}

/// Alias table for every field the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMap {
    pub station: FieldAliases,
    pub depth: FieldAliases,
    pub latitude: FieldAliases,
    pub longitude: FieldAliases,
}

/// Key aliases observed in PFZ API responses and the fallback table.
pub const PFZ_FIELDS: FieldMap = FieldMap {
    station: FieldAliases {
        name: "station",
        keys: &["Station", "station"],
    },
    depth: FieldAliases {
        name: "depth",
        keys: &["Depth", "depth"],
    },
    latitude: FieldAliases {
        name: "latitude",
        keys: &["Latitude", "lat", "Lat"],
    },
    longitude: FieldAliases {
        name: "longitude",
        keys: &["Longitude", "lon", "Lon", "LONGITUDE", "long"],
    },
};

impl Default for FieldMap {
    fn default() -> Self {
        PFZ_FIELDS
    }
}

/// The four logical fields of one record, resolved once.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedFields<'a> {
    pub station: Option<&'a Value>,
    pub depth: Option<&'a Value>,
    pub latitude: Option<&'a Value>,
    pub longitude: Option<&'a Value>,
}

impl FieldMap {
    pub fn resolve<'a>(&self, record: &'a RawRecord) -> ResolvedFields<'a> {
        ResolvedFields {
            station: self.station.resolve(record),
            depth: self.depth.resolve(record),
            latitude: self.latitude.resolve(record),
            longitude: self.longitude.resolve(record),
        }
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}
