//! Log identity

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Immutable identity of one CT log
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogIdentity {
    /// Base64 of the binary log ID, as the witness keys it
    pub id: String,
    /// Human-readable description from the log list
    pub name: String,
}

impl LogIdentity {
    /// Identity from the binary log ID and its description
    pub fn new(log_id: &[u8], name: impl Into<String>) -> Self {
        Self {
            id: STANDARD.encode(log_id),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for LogIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
