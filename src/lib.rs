//! Witness feeder: keeps a CT witness up to date with every usable log
//!
//! Each log gets its own feed loop that polls the log's latest STH and, when
//! the log has grown, hands the new STH and a consistency proof to the
//! witness.

pub mod config;
pub mod core;
pub mod error;
pub mod telemetry;
pub mod types;

// =============================================================================
// DEFAULTS
// =============================================================================

/// Published CT log list (v3 schema)
pub const DEFAULT_LOG_LIST_URL: &str = "https://www.gstatic.com/ct/log_list/v3/log_list.json";

/// How often each log is polled (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
