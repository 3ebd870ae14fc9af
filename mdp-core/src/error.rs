/// Error types for fetching PFZ records
use thiserror::Error;

/// Reasons a record fetch can fail. The `Display` text is what the user sees.
#[derive(Error, Debug)]
pub enum FetchError {
    /// No state or station name was given
    #[error("Enter a state or station name")]
    MissingState,

    /// Server answered with a non-success status
    #[error("Request failed: {status} {reason}\nResponse:\n{snippet}")]
    Status {
        status: u16,
        reason: String,
        snippet: String,
    },

    /// Body was neither declared as nor parseable as JSON
    #[error("Expected JSON but server returned content-type=\"{content_type}\" and body:\n{snippet}")]
    NotJson {
        content_type: String,
        snippet: String,
    },

    /// Body declared as JSON failed to parse
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport-level failure
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Type alias for Results using FetchError
pub type Result<T> = std::result::Result<T, FetchError>;
