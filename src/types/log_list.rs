//! CT log list (v3 schema)
//!
//! Only the fields the feeder needs are modelled; the rest of the document
//! is ignored. A log's status is the single key present in its `state`
//! object.

use serde::Deserialize;

use crate::error::RegistryError;

/// Published list of log operators and their logs
#[derive(Debug, Clone, Deserialize)]
pub struct LogList {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub log_list_timestamp: Option<String>,
    pub operators: Vec<Operator>,
}

/// A log operator
#[derive(Debug, Clone, Deserialize)]
pub struct Operator {
    pub name: String,
    #[serde(default)]
    pub email: Vec<String>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

/// One log in the list
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    pub description: String,
    /// Base64 SHA-256 of `key`
    pub log_id: String,
    /// Base64 DER SubjectPublicKeyInfo
    pub key: String,
    /// Base URL of the RFC 6962 API
    pub url: String,
    /// Maximum merge delay (seconds)
    #[serde(default)]
    pub mmd: Option<u64>,
    #[serde(default)]
    pub state: Option<LogState>,
}

/// Status timestamp wrapper; extra fields such as `final_tree_head` are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct StateTimestamp {
    pub timestamp: String,
}

/// Raw `state` object of a log entry
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogState {
    #[serde(default)]
    pub pending: Option<StateTimestamp>,
    #[serde(default)]
    pub qualified: Option<StateTimestamp>,
    #[serde(default)]
    pub usable: Option<StateTimestamp>,
    #[serde(default)]
    pub readonly: Option<StateTimestamp>,
    #[serde(default)]
    pub retired: Option<StateTimestamp>,
    #[serde(default)]
    pub rejected: Option<StateTimestamp>,
}

/// Lifecycle status of a log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Undefined,
    Pending,
    Qualified,
    Usable,
    ReadOnly,
    Retired,
    Rejected,
}

impl LogState {
    pub fn status(&self) -> LogStatus {
        if self.pending.is_some() {
            LogStatus::Pending
        } else if self.qualified.is_some() {
            LogStatus::Qualified
        } else if self.usable.is_some() {
            LogStatus::Usable
        } else if self.readonly.is_some() {
            LogStatus::ReadOnly
        } else if self.retired.is_some() {
            LogStatus::Retired
        } else if self.rejected.is_some() {
            LogStatus::Rejected
        } else {
            LogStatus::Undefined
        }
    }
}

impl LogEntry {
    pub fn status(&self) -> LogStatus {
        self.state.as_ref().map_or(LogStatus::Undefined, LogState::status)
    }
}

impl LogList {
    /// Parse a log list document
    pub fn from_json(body: &[u8]) -> Result<Self, RegistryError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Every log marked usable, across all operators
    pub fn usable_logs(&self) -> impl Iterator<Item = &LogEntry> {
        self.operators
            .iter()
            .flat_map(|op| op.logs.iter())
            .filter(|log| log.status() == LogStatus::Usable)
    }
}
