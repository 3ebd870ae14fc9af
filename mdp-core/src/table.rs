use crate::coordinate;
use crate::fields::{FieldMap, PFZ_FIELDS};
use crate::record::{scalar_text, RawRecord};
use mdp_utils::display::{format_coordinate, or_placeholder};
use serde::Serialize;

/// Column headers of the station table.
pub const TABLE_HEADERS: [&str; 4] = ["Station", "Depth", "Latitude", "Longitude"];

/// One display row. Every record gets a row, mappable or not; missing or
/// unparseable cells show the placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub station: String,
    pub depth: String,
    pub latitude: String,
    pub longitude: String,
}

impl TableRow {
    pub fn from_record(fields: &FieldMap, record: &RawRecord) -> Self {
        let resolved = fields.resolve(record);
        let text = |v: Option<&serde_json::Value>| {
            or_placeholder(v.and_then(scalar_text).as_deref())
        };
        TableRow {
            station: text(resolved.station),
            depth: text(resolved.depth),
            latitude: format_coordinate(coordinate::parse_latitude(resolved.latitude)),
            longitude: format_coordinate(coordinate::parse_longitude(resolved.longitude)),
        }
    }

    pub fn cells(&self) -> [&str; 4] {
        [
            self.station.as_str(),
            self.depth.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
        ]
    }
}

/// Rows for every record, in input order.
pub fn table_rows<'a, I>(records: I) -> Vec<TableRow>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    records
        .into_iter()
        .map(|record| TableRow::from_record(&PFZ_FIELDS, record))
        .collect()
}

/// Notice shown in place of an empty table.
pub fn empty_table_notice(loaded: usize, shown: usize) -> Option<&'static str> {
    match (loaded, shown) {
        (0, _) => Some("No data loaded"),
        (_, 0) => Some("No results for your filter"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_with_placeholders() {
        let record: RawRecord =
            serde_json::from_value(json!({"Station": "Harnai", "Longitude": "73 5"})).unwrap();
        let row = TableRow::from_record(&PFZ_FIELDS, &record);
        assert_eq!(row.cells(), ["Harnai", "-", "-", "73.083333"]);
    }

    #[test]
    fn test_row_formats_coordinates() {
        let record: RawRecord = serde_json::from_value(
            json!({"station": "Vengurla", "depth": 35, "lat": 15.86, "lon": "73.63"}),
        )
        .unwrap();
        let rows = table_rows([&record]);
        assert_eq!(rows[0].cells(), ["Vengurla", "35", "15.860000", "73.630000"]);
    }

    #[test]
    fn test_empty_notice() {
        assert_eq!(empty_table_notice(0, 0), Some("No data loaded"));
        assert_eq!(empty_table_notice(5, 0), Some("No results for your filter"));
        assert_eq!(empty_table_notice(5, 2), None);
    }
}
