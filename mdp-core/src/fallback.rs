use crate::error::Result;
use crate::fetch::RecordSource;
use crate::record::RawRecord;
use log::info;
use mdp_utils::display::title_case;
use std::collections::HashMap;

/// Embedded PFZ records keyed by lower-case state name.
pub static FALLBACK_JSON: &str = include_str!("../../fixtures/pfz_fallback.json");

/// States offered in the selector, as sent to the API.
pub const KNOWN_STATES: [&str; 5] = ["maharashtra", "kerala", "karnataka", "gujrat", "goa"];

/// `(value, label)` pairs for a state selector.
pub fn state_options() -> Vec<(&'static str, String)> {
    KNOWN_STATES.iter().map(|s| (*s, title_case(s))).collect()
}

/// Offline record source backed by a static state -> records table.
#[derive(Debug, Clone, Default)]
pub struct FallbackSource {
    table: HashMap<String, Vec<RawRecord>>,
}

impl FallbackSource {
    /// Source over the embedded fixture table.
    pub fn embedded() -> Result<Self> {
        Self::from_json(FALLBACK_JSON)
    }

    /// Parse a `{ "state": [record, ...], ... }` document. Keys are lower-cased.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: HashMap<String, Vec<RawRecord>> = serde_json::from_str(json)?;
        let table = parsed
            .into_iter()
            .map(|(state, records)| (state.to_lowercase(), records))
            .collect();
        Ok(Self { table })
    }

    /// Records for `state_name`, matched case-insensitively; unknown names yield none.
    pub fn lookup(&self, state_name: &str) -> Vec<RawRecord> {
        let key = state_name.trim().to_lowercase();
        match self.table.get(&key) {
            Some(records) => records.clone(),
            None => {
                info!("no fallback records for {:?}", state_name);
                Vec::new()
            }
        }
    }
}

impl RecordSource for FallbackSource {
    async fn fetch(&self, state_name: &str) -> Result<Vec<RawRecord>> {
        Ok(self.lookup(state_name))
    }
}
