use crate::export::DEFAULT_FILENAME;
use mdp_utils::text::SNIPPET_LIMIT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for talking to the PFZ API and exporting its records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Base URL, e.g. "https://portal.example.org". `/api/pfz` is appended.
    pub api_base: String,
    /// File name offered for CSV downloads.
    pub export_filename: String,
    /// Characters of an error body kept in user-facing messages.
    pub snippet_limit: usize,
    /// Per-request timeout; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            export_filename: DEFAULT_FILENAME.to_string(),
            snippet_limit: SNIPPET_LIMIT,
            request_timeout: None,
        }
    }
}

impl PortalConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Full PFZ endpoint without the query string.
    pub fn pfz_endpoint(&self) -> String {
        format!("{}/api/pfz", self.api_base.trim_end_matches('/'))
    }
}
