//! Per-log witnessed state
//!
//! Starts absent (tree size 0) on every run. Replaced as a whole, never
//! patched field by field.

use crate::error::SthParseError;
use super::SignedTreeHead;

/// An STH the witness reported holding, with the bytes it returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessedSth {
    pub sth: SignedTreeHead,
    pub raw: Vec<u8>,
}

/// Last STH known to be held by the witness for one log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogStateSnapshot {
    witnessed: Option<WitnessedSth>,
}

impl LogStateSnapshot {
    /// No witnessed state yet
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from the STH bytes the witness returned
    pub fn from_witness_response(raw: Vec<u8>) -> Result<Self, SthParseError> {
        let sth = SignedTreeHead::from_json(&raw)?;
        Ok(Self {
            witnessed: Some(WitnessedSth { sth, raw }),
        })
    }

    /// Witnessed tree size, 0 when absent
    pub fn tree_size(&self) -> u64 {
        self.witnessed.as_ref().map_or(0, |w| w.sth.tree_size)
    }

    pub fn is_present(&self) -> bool {
        self.witnessed.is_some()
    }

    pub fn sth(&self) -> Option<&SignedTreeHead> {
        self.witnessed.as_ref().map(|w| &w.sth)
    }

    pub fn raw(&self) -> Option<&[u8]> {
        self.witnessed.as_ref().map(|w| w.raw.as_slice())
    }
}
