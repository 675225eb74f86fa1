//! Signed Tree Head types
//!
//! Based on RFC 6962 §4.3 (`get-sth`):
//! - JSON body: tree_size, timestamp, sha256_root_hash, tree_head_signature
//! - Binary fields are base64
//! - Signature is a TLS `DigitallySigned` struct
//!
//! Signatures are parsed, never verified.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SthParseError;

/// SHA-256 root hash length
pub const ROOT_HASH_LEN: usize = 32;

/// DigitallySigned header: hash alg (1) + signature alg (1) + length (2)
const DIGITALLY_SIGNED_HEADER_LEN: usize = 4;

/// `get-sth` response body, as served by logs and returned by the witness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetSthResponse {
    pub tree_size: u64,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    /// Base64 SHA-256 root hash
    pub sha256_root_hash: String,
    /// Base64 TLS-encoded DigitallySigned
    pub tree_head_signature: String,
}

impl GetSthResponse {
    /// Decode the JSON body
    pub fn from_json(raw: &[u8]) -> Result<Self, SthParseError> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// Decode the binary fields into a [`SignedTreeHead`]
    pub fn to_signed_tree_head(&self) -> Result<SignedTreeHead, SthParseError> {
        let root = decode_field("sha256_root_hash", &self.sha256_root_hash)?;
        let sha256_root_hash: [u8; ROOT_HASH_LEN] = root
            .as_slice()
            .try_into()
            .map_err(|_| SthParseError::RootHashLength(root.len()))?;

        let signature = decode_field("tree_head_signature", &self.tree_head_signature)?;
        let tree_head_signature = DigitallySigned::from_bytes(&signature)?;

        Ok(SignedTreeHead {
            tree_size: self.tree_size,
            timestamp: self.timestamp,
            sha256_root_hash,
            tree_head_signature,
        })
    }
}

impl From<&SignedTreeHead> for GetSthResponse {
    fn from(sth: &SignedTreeHead) -> Self {
        Self {
            tree_size: sth.tree_size,
            timestamp: sth.timestamp,
            sha256_root_hash: STANDARD.encode(sth.sha256_root_hash),
            tree_head_signature: STANDARD.encode(sth.tree_head_signature.to_bytes()),
        }
    }
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, SthParseError> {
    STANDARD
        .decode(value)
        .map_err(|source| SthParseError::Base64 { field, source })
}

/// TLS `DigitallySigned` (RFC 5246 §4.7)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitallySigned {
    pub hash_algorithm: u8,
    pub signature_algorithm: u8,
    pub signature: Vec<u8>,
}

impl DigitallySigned {
    /// Parse the wire form; trailing bytes are rejected
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SthParseError> {
        if bytes.len() < DIGITALLY_SIGNED_HEADER_LEN {
            return Err(SthParseError::SignatureTruncated(bytes.len()));
        }

        let declared = u16::from_be_bytes([bytes[2], bytes[3]]) as usize;
        let signature = &bytes[DIGITALLY_SIGNED_HEADER_LEN..];
        if signature.len() != declared {
            return Err(SthParseError::SignatureLength {
                declared,
                actual: signature.len(),
            });
        }

        Ok(Self {
            hash_algorithm: bytes[0],
            signature_algorithm: bytes[1],
            signature: signature.to_vec(),
        })
    }

    /// Serialize to the wire form
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(DIGITALLY_SIGNED_HEADER_LEN + self.signature.len());
        bytes.push(self.hash_algorithm);
        bytes.push(self.signature_algorithm);
        bytes.extend_from_slice(&(self.signature.len() as u16).to_be_bytes());
        bytes.extend_from_slice(&self.signature);
        bytes
    }
}

/// A log's signed statement of its size and root hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTreeHead {
    pub tree_size: u64,
    pub timestamp: u64,
    pub sha256_root_hash: [u8; ROOT_HASH_LEN],
    pub tree_head_signature: DigitallySigned,
}

impl SignedTreeHead {
    /// Parse a raw `get-sth` JSON body
    pub fn from_json(raw: &[u8]) -> Result<Self, SthParseError> {
        GetSthResponse::from_json(raw)?.to_signed_tree_head()
    }

    /// Encode as a `get-sth` JSON body
    pub fn to_json(&self) -> Vec<u8> {
        // Plain struct of integers and strings
        serde_json::to_vec(&GetSthResponse::from(self)).unwrap_or_default()
    }

    /// When the log issued this STH, if the timestamp is representable
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.timestamp).ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

/// Latest STH fetched from a log, with the exact bytes it served
///
/// The raw bytes are what gets forwarded to the witness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSth {
    pub sth: SignedTreeHead,
    pub raw: Vec<u8>,
}

impl FetchedSth {
    /// Parse a raw `get-sth` body, keeping the bytes
    pub fn from_raw(raw: Vec<u8>) -> Result<Self, SthParseError> {
        let sth = SignedTreeHead::from_json(&raw)?;
        Ok(Self { sth, raw })
    }
}
