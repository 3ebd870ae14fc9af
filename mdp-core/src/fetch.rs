//! Fetch lifecycle for PFZ records.
//!
//! A [`PfzSession`] moves through `Idle -> Loading -> {Success, Error}`.
//! Every request gets a [`RequestTicket`] carrying a generation number; a
//! completion whose ticket is older than the newest request is dropped, so an
//! out-of-order response can never replace fresher data. There is no retry.

use crate::error::{FetchError, Result};
use crate::record::RawRecord;
use log::{error, info, warn};
use mdp_utils::text::truncate_snippet;
use serde_json::Value;

#[cfg(feature = "api")]
use crate::config::PortalConfig;
#[cfg(feature = "api")]
use reqwest::{header::CONTENT_TYPE, Client};

/// Shown when a fetch succeeds with zero records.
pub const EMPTY_RESULT_NOTICE: &str = "No points found. Try a Station name (e.g. 'Dighi')";

/// Anything that can supply the raw records for a state or station name.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    async fn fetch(&self, state_name: &str) -> Result<Vec<RawRecord>>;
}

/// Where the session is in the fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    /// A request is in flight. `previous` stays on screen until it completes.
    Loading {
        generation: u64,
        previous: Vec<RawRecord>,
    },
    /// Completed; `records` may be empty.
    Success { records: Vec<RawRecord> },
    /// Completed with a failure; no records are kept.
    Error { message: String },
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub generation: u64,
}

/// Holds the single source of truth for the currently loaded record set.
#[derive(Debug, Default)]
pub struct PfzSession {
    state: FetchState,
    generation: u64,
}

impl PfzSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading { .. })
    }

    /// Start a request for `state_name`.
    ///
    /// A blank name is rejected before anything changes.
    pub fn begin(&mut self, state_name: &str) -> Result<RequestTicket> {
        if state_name.trim().is_empty() {
            return Err(FetchError::MissingState);
        }
        self.generation += 1;
        let previous = match std::mem::take(&mut self.state) {
            FetchState::Success { records } => records,
            FetchState::Loading { previous, .. } => previous,
            FetchState::Idle | FetchState::Error { .. } => Vec::new(),
        };
        self.state = FetchState::Loading {
            generation: self.generation,
            previous,
        };
        info!("fetch #{} started for {:?}", self.generation, state_name);
        Ok(RequestTicket {
            generation: self.generation,
        })
    }

    /// Apply a completed request. Returns `false` if the ticket was stale
    /// and the outcome was discarded.
    pub fn finish(&mut self, ticket: RequestTicket, outcome: Result<Vec<RawRecord>>) -> bool {
        if ticket.generation != self.generation {
            warn!(
                "discarding stale response #{} (latest is #{})",
                ticket.generation, self.generation
            );
            return false;
        }
        self.state = match outcome {
            Ok(records) => {
                info!("fetch #{} loaded {} records", ticket.generation, records.len());
                FetchState::Success { records }
            }
            Err(e) => {
                error!("fetch #{} failed: {}", ticket.generation, e);
                FetchState::Error {
                    message: e.to_string(),
                }
            }
        };
        true
    }

    /// Issue a request against `source` and apply its outcome.
    ///
    /// The session stays borrowed until the response arrives, so requests
    /// issued this way never overlap. Hosts that fire concurrent fetches call
    /// [`begin`](Self::begin) and [`finish`](Self::finish) themselves.
    pub async fn load<S: RecordSource>(&mut self, source: &S, state_name: &str) -> &FetchState {
        match self.begin(state_name) {
            Ok(ticket) => {
                let outcome = source.fetch(state_name).await;
                self.finish(ticket, outcome);
            }
            Err(e) => warn!("fetch not started: {}", e),
        }
        &self.state
    }

    /// Records currently on display.
    pub fn records(&self) -> &[RawRecord] {
        match &self.state {
            FetchState::Success { records } => records,
            FetchState::Loading { previous, .. } => previous,
            FetchState::Idle | FetchState::Error { .. } => &[],
        }
    }

    /// User-facing message: the error text, or the soft notice for an empty result.
    pub fn notice(&self) -> Option<&str> {
        match &self.state {
            FetchState::Error { message } => Some(message),
            FetchState::Success { records } if records.is_empty() => Some(EMPTY_RESULT_NOTICE),
            _ => None,
        }
    }
}

/// Turn an HTTP status, content type and body into records or a [`FetchError`].
pub fn interpret_response(
    status: u16,
    reason: &str,
    content_type: &str,
    body: &str,
    snippet_limit: usize,
) -> Result<Vec<RawRecord>> {
    if !(200..300).contains(&status) {
        return Err(FetchError::Status {
            status,
            reason: reason.to_string(),
            snippet: truncate_snippet(body, snippet_limit),
        });
    }
    let content_type = content_type.to_lowercase();
    let value: Value = if content_type.contains("application/json") {
        serde_json::from_str(body)?
    } else {
        serde_json::from_str(body).map_err(|_| FetchError::NotJson {
            content_type: content_type.clone(),
            snippet: truncate_snippet(body, snippet_limit),
        })?
    };
    Ok(records_from_json(value))
}

/// Accept a JSON array of objects. Anything else yields no records.
pub fn records_from_json(value: Value) -> Vec<RawRecord> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(RawRecord::from(map)),
                other => {
                    warn!("skipping non-object record: {}", other);
                    None
                }
            })
            .collect(),
        other => {
            warn!("expected an array of records, got: {}", truncate_snippet(&other.to_string(), 80));
            Vec::new()
        }
    }
}

/// Fetches records from `GET {api_base}/api/pfz?state=<name>`.
#[cfg(feature = "api")]
pub struct HttpSource {
    client: Client,
    config: PortalConfig,
}

#[cfg(feature = "api")]
impl HttpSource {
    pub fn new(config: PortalConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }
}

#[cfg(feature = "api")]
impl RecordSource for HttpSource {
    async fn fetch(&self, state_name: &str) -> Result<Vec<RawRecord>> {
        let url = self.config.pfz_endpoint();
        info!("GET {}?state={}", url, state_name);
        let response = self
            .client
            .get(&url)
            .query(&[("state", state_name)])
            .send()
            .await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;
        interpret_response(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            &content_type,
            &body,
            self.config.snippet_limit,
        )
    }
}
