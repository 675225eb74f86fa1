//! Core types for the witness feeder

mod sth;
mod snapshot;
mod log;
mod log_list;
mod outcome;

pub use sth::{GetSthResponse, SignedTreeHead, DigitallySigned, FetchedSth, ROOT_HASH_LEN};
pub use snapshot::{LogStateSnapshot, WitnessedSth};
pub use log::LogIdentity;
pub use log_list::{LogList, Operator, LogEntry, LogState, LogStatus, StateTimestamp};
pub use outcome::{WitnessUpdateOutcome, RoundOutcome};
