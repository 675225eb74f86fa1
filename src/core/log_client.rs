//! RFC 6962 log client
//!
//! Endpoints used:
//! - GET {base}/ct/v1/get-sth
//! - GET {base}/ct/v1/get-sth-consistency?first=A&second=B

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use url::Url;

use crate::error::{ClientConstructionError, LogClientError};
use crate::types::FetchedSth;

pub const GET_STH_PATH: &str = "ct/v1/get-sth";
pub const GET_STH_CONSISTENCY_PATH: &str = "ct/v1/get-sth-consistency";

/// Read side of a transparency log
///
/// Implementations return already-validated objects; the feeder does not
/// check signatures.
#[async_trait]
pub trait LogReader: Send + Sync {
    /// Latest STH plus the raw body it was parsed from
    async fn latest_sth(&self) -> Result<FetchedSth, LogClientError>;

    /// Consistency proof from tree size `first` to `second`
    async fn consistency_proof(&self, first: u64, second: u64) -> Result<Vec<Vec<u8>>, LogClientError>;
}

/// `get-sth-consistency` response body
#[derive(Debug, Deserialize)]
struct GetSthConsistencyResponse {
    consistency: Vec<String>,
}

/// HTTP client for one CT log
#[derive(Debug, Clone)]
pub struct CtLogClient {
    base_url: Url,
    http: reqwest::Client,
}

impl CtLogClient {
    /// Build a client for the log at `url`
    ///
    /// `log_id` must be the SHA-256 of `key`, as RFC 6962 §3.2 defines it.
    pub fn new(
        url: &str,
        key: &[u8],
        log_id: &[u8],
        http: reqwest::Client,
    ) -> Result<Self, ClientConstructionError> {
        if key.is_empty() {
            return Err(ClientConstructionError::EmptyKey);
        }
        if Sha256::digest(key).as_slice() != log_id {
            return Err(ClientConstructionError::LogIdMismatch {
                log_id: STANDARD.encode(log_id),
            });
        }

        let base_url = base_url(url)?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get(&self, path: &str, query: &[(&str, u64)]) -> Result<Vec<u8>, LogClientError> {
        let url = self.base_url.join(path)?;
        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(LogClientError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body.to_vec())
    }
}

/// Parse `url` as a base URL whose path ends in `/`, so that joins append
pub(crate) fn base_url(url: &str) -> Result<Url, ClientConstructionError> {
    let mut parsed = Url::parse(url).map_err(|source| ClientConstructionError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    if parsed.cannot_be_a_base() {
        return Err(ClientConstructionError::NotABaseUrl(url.to_string()));
    }
    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }
    Ok(parsed)
}

#[async_trait]
impl LogReader for CtLogClient {
    async fn latest_sth(&self) -> Result<FetchedSth, LogClientError> {
        let raw = self.get(GET_STH_PATH, &[]).await?;
        Ok(FetchedSth::from_raw(raw)?)
    }

    async fn consistency_proof(&self, first: u64, second: u64) -> Result<Vec<Vec<u8>>, LogClientError> {
        let raw = self
            .get(GET_STH_CONSISTENCY_PATH, &[("first", first), ("second", second)])
            .await?;
        let response: GetSthConsistencyResponse = serde_json::from_slice(&raw)?;

        response
            .consistency
            .iter()
            .map(|hash| STANDARD.decode(hash).map_err(LogClientError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test log key";

    fn log_id() -> Vec<u8> {
        Sha256::digest(KEY).to_vec()
    }

    #[test]
    fn test_new_client() {
        let client = CtLogClient::new(
            "https://ct.example.com/logs/test2024/",
            KEY,
            &log_id(),
            reqwest::Client::new(),
        )
        .unwrap();
        assert_eq!(client.base_url().as_str(), "https://ct.example.com/logs/test2024/");
    }

    #[test]
    fn test_trailing_slash_added() {
        let client = CtLogClient::new(
            "https://ct.example.com/logs/test2024",
            KEY,
            &log_id(),
            reqwest::Client::new(),
        )
        .unwrap();
        let sth_url = client.base_url().join(GET_STH_PATH).unwrap();
        assert_eq!(sth_url.as_str(), "https://ct.example.com/logs/test2024/ct/v1/get-sth");
    }

    #[test]
    fn test_reject_empty_key() {
        let err = CtLogClient::new("https://ct.example.com/", &[], &log_id(), reqwest::Client::new())
            .unwrap_err();
        assert!(matches!(err, ClientConstructionError::EmptyKey));
    }

    #[test]
    fn test_reject_log_id_mismatch() {
        let err = CtLogClient::new("https://ct.example.com/", KEY, &[0u8; 32], reqwest::Client::new())
            .unwrap_err();
        assert!(matches!(err, ClientConstructionError::LogIdMismatch { .. }));
    }

    #[test]
    fn test_reject_bad_url() {
        let err = CtLogClient::new("not a url", KEY, &log_id(), reqwest::Client::new()).unwrap_err();
        assert!(matches!(err, ClientConstructionError::InvalidUrl { .. }));

        let err = CtLogClient::new("mailto:ct@example.com", KEY, &log_id(), reqwest::Client::new())
            .unwrap_err();
        assert!(matches!(err, ClientConstructionError::NotABaseUrl(_)));
    }
}
