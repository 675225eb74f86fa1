//! Witness HTTP client
//!
//! Endpoint:
//! - PUT {base}/witness/v0/logs/{log_id}/update
//!   body `{"STH": base64, "Proof": [base64, ...]}`
//!
//! Responses:
//! - 200: accepted, body is the witness's new STH
//! - 409: STH too old, body is the STH the witness already holds
//! - anything else is an error

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::log_client::base_url;
use crate::error::{ClientConstructionError, WitnessError};
use crate::types::WitnessUpdateOutcome;

/// Something that can be asked to cosign a log's new STH
#[async_trait]
pub trait Witness: Send + Sync {
    /// Submit `sth` for `log_id`, with a proof from the witness's current size
    ///
    /// An empty proof is sent when the witness has never seen the log.
    async fn update(
        &self,
        log_id: &str,
        sth: &[u8],
        proof: &[Vec<u8>],
    ) -> Result<WitnessUpdateOutcome, WitnessError>;
}

/// Update request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRequest {
    #[serde(rename = "STH")]
    pub sth: String,
    #[serde(rename = "Proof", default)]
    pub proof: Vec<String>,
}

impl UpdateRequest {
    pub fn new(sth: &[u8], proof: &[Vec<u8>]) -> Self {
        Self {
            sth: STANDARD.encode(sth),
            proof: proof.iter().map(|hash| STANDARD.encode(hash)).collect(),
        }
    }

    /// Decode back into STH bytes and proof hashes
    pub fn decode(&self) -> Result<(Vec<u8>, Vec<Vec<u8>>), base64::DecodeError> {
        let sth = STANDARD.decode(&self.sth)?;
        let proof = self
            .proof
            .iter()
            .map(|hash| STANDARD.decode(hash))
            .collect::<Result<_, _>>()?;
        Ok((sth, proof))
    }
}

/// HTTP client for a witness
#[derive(Debug, Clone)]
pub struct HttpWitness {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpWitness {
    pub fn new(url: &str, http: reqwest::Client) -> Result<Self, ClientConstructionError> {
        Ok(Self {
            base_url: base_url(url)?,
            http,
        })
    }

    /// Update URL for a log; the ID is escaped as one path segment
    pub fn update_url(&self, log_id: &str) -> Url {
        let mut url = self.base_url.clone();
        // base_url() rejected cannot-be-a-base URLs
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["witness", "v0", "logs", log_id, "update"]);
        }
        url
    }
}

#[async_trait]
impl Witness for HttpWitness {
    async fn update(
        &self,
        log_id: &str,
        sth: &[u8],
        proof: &[Vec<u8>],
    ) -> Result<WitnessUpdateOutcome, WitnessError> {
        let response = self
            .http
            .put(self.update_url(log_id))
            .json(&UpdateRequest::new(sth, proof))
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        match status {
            StatusCode::OK => Ok(WitnessUpdateOutcome::Accepted(body)),
            StatusCode::CONFLICT => Ok(WitnessUpdateOutcome::TooOld(body)),
            _ => Err(WitnessError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            }),
        }
    }
}
