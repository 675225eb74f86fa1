//! Session supervisor: one feed loop per log
//!
//! Loops share only the witness client and the shutdown signal. Each task
//! owns its session outright, so there is no cross-log locking.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::FeederConfig;
use crate::core::feeder::{run_feed_loop, LogSession};
use crate::core::registry::load_sessions;
use crate::core::witness::{HttpWitness, Witness};
use crate::error::StartupError;

/// Run a feed loop per session until `shutdown` fires, then return them
///
/// A loop that panics is logged and left out of the result; it never takes
/// the other loops down.
pub async fn run_sessions(
    sessions: Vec<LogSession>,
    witness: Arc<dyn Witness>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
) -> Vec<LogSession> {
    info!(logs = sessions.len(), ?interval, "starting feed loops");

    let handles: Vec<_> = sessions
        .into_iter()
        .map(|session| {
            tokio::spawn(run_feed_loop(
                session,
                Arc::clone(&witness),
                interval,
                shutdown.clone(),
            ))
        })
        .collect();

    let mut stopped = Vec::with_capacity(handles.len());
    for result in join_all(handles).await {
        match result {
            Ok(session) => stopped.push(session),
            Err(e) => error!(error = %e, "feed loop task failed"),
        }
    }
    stopped
}

/// Set up clients from `config` and feed every usable log until shutdown
pub async fn run_feeder(
    config: &FeederConfig,
    shutdown: watch::Receiver<bool>,
) -> Result<Vec<LogSession>, StartupError> {
    let http = config.http_client().map_err(StartupError::HttpClient)?;
    let witness = HttpWitness::new(&config.witness_url, http.clone()).map_err(StartupError::Witness)?;

    // No initial witnessed STH: every session starts from size 0
    let sessions = load_sessions(&http, &config.log_list_url).await?;

    Ok(run_sessions(sessions, Arc::new(witness), config.poll_interval, shutdown).await)
}
