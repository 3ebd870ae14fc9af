use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// A raw station record as delivered by the PFZ API or the fallback table.
///
/// Keys keep the source's casing and order; nothing about the schema is
/// guaranteed. Values are JSON scalars in practice (string, number, null).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Insert a field, keeping first-insertion order for new keys.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw lookup by exact key. A present `null` is returned as `Some(Value::Null)`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Keys in the record's own iteration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stringified value of `key`, or `None` when absent or `null`.
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).and_then(scalar_text)
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Render a scalar the way a text cell would show it.
///
/// `null` has no text. Nested arrays/objects are rendered as compact JSON.
pub fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        other => Some(Cow::Owned(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_keeps_key_order() {
        let record: RawRecord =
            serde_json::from_value(json!({"Station": "Dighi", "Depth": "40", "Latitude": 18.1}))
                .unwrap();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["Station", "Depth", "Latitude"]);
    }

    #[test]
    fn test_text_of_scalars() {
        let record: RawRecord = [
            ("a", json!("x")),
            ("b", json!(12)),
            ("c", json!(null)),
            ("d", json!(true)),
        ]
        .into_iter()
        .collect();
        assert_eq!(record.text("a").as_deref(), Some("x"));
        assert_eq!(record.text("b").as_deref(), Some("12"));
        assert_eq!(record.text("c"), None);
        assert_eq!(record.text("d").as_deref(), Some("true"));
        assert_eq!(record.text("missing"), None);
    }
}
