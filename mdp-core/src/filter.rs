//! Case-insensitive substring filter over station name and depth.

use crate::fields::{FieldMap, PFZ_FIELDS};
use crate::record::{scalar_text, RawRecord};

/// Filter with the default PFZ alias table.
pub fn filter<'a, I>(records: I, query: &str) -> Vec<&'a RawRecord>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    filter_with(&PFZ_FIELDS, records, query)
}

/// Keep records whose station or depth text contains `query`, ignoring case.
///
/// An empty query keeps every record. Input order is preserved and the
/// records themselves are never touched.
pub fn filter_with<'a, I>(fields: &FieldMap, records: I, query: &str) -> Vec<&'a RawRecord>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    if query.is_empty() {
        return records.into_iter().collect();
    }
    let needle = query.to_lowercase();
    records
        .into_iter()
        .filter(|record| matches(fields, record, &needle))
        .collect()
}

fn matches(fields: &FieldMap, record: &RawRecord, needle: &str) -> bool {
    [&fields.station, &fields.depth].iter().any(|field| {
        field
            .resolve(record)
            .and_then(scalar_text)
            .map(|text| text.to_lowercase().contains(needle))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<RawRecord> {
        vec![
            json!({"Station": "Dighi", "Depth": "40", "Latitude": 18.1, "Longitude": 72.9}),
            json!({"station": "Murud", "depth": 25, "lat": 18.3, "lon": 72.9}),
            json!({"Station": "Ratnagiri", "Depth": "40-50", "Latitude": 17.0}),
            json!({"Station": null, "Depth": null}),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let all = records();
        let kept = filter(&all, "");
        assert_eq!(kept.len(), all.len());
        assert!(kept.iter().zip(all.iter()).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn test_station_match_ignores_case() {
        let all = records();
        let kept = filter(&all, "DIGHI");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text("Station").as_deref(), Some("Dighi"));
    }

    #[test]
    fn test_depth_match_numeric_and_text() {
        let all = records();
        assert_eq!(filter(&all, "40").len(), 2);
        assert_eq!(filter(&all, "25").len(), 1);
    }

    #[test]
    fn test_no_match() {
        let all = records();
        assert!(filter(&all, "goa").is_empty());
    }

    #[test]
    fn test_idempotent() {
        let all = records();
        for q in ["", "a", "40", "mur", "zzz"] {
            let once = filter(&all, q);
            let twice = filter(once.iter().copied(), q);
            assert_eq!(once, twice, "query {:?}", q);
        }
    }
}
