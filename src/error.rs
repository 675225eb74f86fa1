//! Error types for the feeder
//!
//! Startup errors (`RegistryError`, `ClientConstructionError`, `StartupError`)
//! abort the process. Round errors (`FeedError`) are logged by the feed loop
//! and retried on the next tick.

use std::time::Duration;

/// Failure to parse an STH as returned by a log or the witness
#[derive(Debug, thiserror::Error)]
pub enum SthParseError {
    /// Body is not a `get-sth` JSON object
    #[error("invalid STH JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A binary field is not valid base64
    #[error("invalid base64 in {field}: {source}")]
    Base64 {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    /// Root hash is not a SHA-256 digest
    #[error("root hash is {0} bytes, expected 32")]
    RootHashLength(usize),

    /// Signature is shorter than the DigitallySigned header
    #[error("tree head signature truncated at {0} bytes")]
    SignatureTruncated(usize),

    /// Signature length prefix disagrees with the bytes present
    #[error("tree head signature declares {declared} bytes but carries {actual}")]
    SignatureLength { declared: usize, actual: usize },
}

/// Failure to build a client for a log or the witness
#[derive(Debug, thiserror::Error)]
pub enum ClientConstructionError {
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL {0:?} cannot be used as a base URL")]
    NotABaseUrl(String),

    #[error("log key is empty")]
    EmptyKey,

    #[error("log ID {log_id} is not the SHA-256 of the log key")]
    LogIdMismatch { log_id: String },
}

/// Failure to load the log list or build sessions from it
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to retrieve log list: {0}")]
    Fetch(#[source] reqwest::Error),

    #[error("log list request returned HTTP {status}")]
    Status { status: u16 },

    #[error("failed to read HTTP response: {0}")]
    Read(#[source] reqwest::Error),

    #[error("failed to parse log list JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid base64 {field} for log {log:?}: {source}")]
    Decode {
        log: String,
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("failed to create log client for {log:?}: {source}")]
    ClientConstruction {
        log: String,
        #[source]
        source: ClientConstructionError,
    },
}

/// Transport-level failure talking to a CT log
#[derive(Debug, thiserror::Error)]
pub enum LogClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("log returned HTTP {status}: {body:?}")]
    Status { status: u16, body: String },

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid base64 in consistency proof: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to parse response as STH: {0}")]
    Sth(#[from] SthParseError),
}

/// Failure submitting an update to the witness
///
/// A witness that already holds a newer STH is not an error; see
/// [`crate::types::WitnessUpdateOutcome::TooOld`].
#[derive(Debug, thiserror::Error)]
pub enum WitnessError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bad status response ({status}): {body:?}")]
    Status { status: u16, body: String },
}

/// Why one feed round did not advance the session
///
/// None of these stop the feed loop.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("failed to get latest STH: {0}")]
    Fetch(#[source] LogClientError),

    #[error("failed to get consistency proof: {0}")]
    Proof(#[source] LogClientError),

    #[error("failed to update STH: {0}")]
    Submit(#[source] WitnessError),

    #[error("failed to parse witness STH: {0}")]
    Parse(#[source] SthParseError),

    #[error("round did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

/// Fatal error while bringing the feeder up
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to set up witness client: {0}")]
    Witness(#[source] ClientConstructionError),

    #[error("failed to set up log data: {0}")]
    Registry(#[from] RegistryError),
}
