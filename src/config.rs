//! Process configuration
//!
//! Read once at startup. Nothing is persisted between runs.

use std::time::Duration;

use crate::{DEFAULT_LOG_LIST_URL, DEFAULT_POLL_INTERVAL_SECS, VERSION};

/// Everything the feeder needs to run
#[derive(Debug, Clone)]
pub struct FeederConfig {
    /// Where to fetch the CT log list
    pub log_list_url: String,
    /// Base URL of the witness HTTP API
    pub witness_url: String,
    /// Time between rounds; also the deadline for one round
    pub poll_interval: Duration,
    /// Per-request HTTP timeout, on top of the round deadline
    pub request_timeout: Option<Duration>,
}

impl FeederConfig {
    pub fn new(witness_url: impl Into<String>) -> Self {
        Self {
            log_list_url: DEFAULT_LOG_LIST_URL.to_string(),
            witness_url: witness_url.into(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: None,
        }
    }

    /// HTTP client shared by the registry fetch, every log client and the witness
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(format!("witness-feeder/{VERSION}"));
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

/// Parse `10s`, `500ms`, `2m`, `1h` or bare seconds; zero is rejected
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);

    let amount: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration {value:?}: expected a number with optional unit"))?;

    let duration = match unit {
        "" | "s" => Duration::from_secs(amount),
        "ms" => Duration::from_millis(amount),
        "m" => Duration::from_secs(amount.saturating_mul(60)),
        "h" => Duration::from_secs(amount.saturating_mul(3600)),
        other => return Err(format!("invalid duration unit {other:?} in {value:?}")),
    };

    if duration.is_zero() {
        return Err("duration must be greater than zero".to_string());
    }
    Ok(duration)
}
