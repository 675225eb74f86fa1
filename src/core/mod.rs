//! Core modules for the witness feeder

pub mod log_client;
pub mod witness;
pub mod feeder;
pub mod registry;
pub mod supervisor;

pub use log_client::{LogReader, CtLogClient, GET_STH_PATH, GET_STH_CONSISTENCY_PATH};
pub use witness::{Witness, HttpWitness, UpdateRequest};
pub use feeder::{LogSession, FeedLoopState, run_feed_loop};
pub use registry::{fetch_log_list, populate_sessions, load_sessions};
pub use supervisor::{run_sessions, run_feeder};
