//! Results of witness submissions and feed rounds

/// What the witness said about a submitted STH
///
/// Both variants carry the witness's current STH bytes, which become the
/// session's new snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WitnessUpdateOutcome {
    /// Witness verified and stored the new STH
    Accepted(Vec<u8>),
    /// Witness already holds an equal-or-newer STH
    TooOld(Vec<u8>),
}

impl WitnessUpdateOutcome {
    pub fn is_too_old(&self) -> bool {
        matches!(self, WitnessUpdateOutcome::TooOld(_))
    }

    /// The witness's current STH bytes
    pub fn into_state(self) -> Vec<u8> {
        match self {
            WitnessUpdateOutcome::Accepted(raw) | WitnessUpdateOutcome::TooOld(raw) => raw,
        }
    }
}

/// Successful feed round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Witness already at or past the log; nothing proved or submitted
    UpToDate { witnessed: u64, latest: u64 },
    /// Snapshot replaced with the witness's reported state
    Updated {
        from: u64,
        to: u64,
        /// Witness answered "too old"
        stale: bool,
    },
}
