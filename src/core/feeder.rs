//! Per-log feeding: one round, and the loop that repeats it
//!
//! Round:
//! - fetch latest STH from the log
//! - witness at or past the log → nothing to do
//! - fetch a consistency proof (skipped when the witness has seen nothing)
//! - submit to the witness; "too old" is not a failure
//! - replace the snapshot with whatever the witness reports
//!
//! The snapshot is only written at the last step, so any failure leaves it
//! as it was and the next tick re-derives the same decision.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::core::log_client::LogReader;
use crate::core::witness::Witness;
use crate::error::FeedError;
use crate::types::{LogIdentity, LogStateSnapshot, RoundOutcome};

/// Feeding state for one log
pub struct LogSession {
    identity: LogIdentity,
    snapshot: LogStateSnapshot,
    reader: Box<dyn LogReader>,
}

impl std::fmt::Debug for LogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSession")
            .field("identity", &self.identity)
            .field("witnessed_size", &self.snapshot.tree_size())
            .finish_non_exhaustive()
    }
}

impl LogSession {
    /// New session with no witnessed state
    pub fn new(identity: LogIdentity, reader: Box<dyn LogReader>) -> Self {
        Self {
            identity,
            snapshot: LogStateSnapshot::empty(),
            reader,
        }
    }

    pub fn identity(&self) -> &LogIdentity {
        &self.identity
    }

    pub fn snapshot(&self) -> &LogStateSnapshot {
        &self.snapshot
    }

    /// Tree size of the last witnessed STH, 0 if none
    pub fn witnessed_size(&self) -> u64 {
        self.snapshot.tree_size()
    }

    /// Try to move the witness up to the log's latest STH
    pub async fn feed_once(&mut self, witness: &dyn Witness) -> Result<RoundOutcome, FeedError> {
        let latest = self.reader.latest_sth().await.map_err(FeedError::Fetch)?;
        let latest_size = latest.sth.tree_size;
        let witnessed = self.snapshot.tree_size();

        if witnessed >= latest_size {
            debug!(
                log = %self.identity,
                witnessed,
                latest = latest_size,
                "witness size >= log size, nothing to do"
            );
            return Ok(RoundOutcome::UpToDate {
                witnessed,
                latest: latest_size,
            });
        }

        info!(
            log = %self.identity,
            witnessed,
            latest = latest_size,
            issued_at = ?latest.sth.issued_at(),
            "updating witness"
        );

        let proof = if witnessed > 0 {
            self.reader
                .consistency_proof(witnessed, latest_size)
                .await
                .map_err(FeedError::Proof)?
        } else {
            Vec::new()
        };

        let outcome = witness
            .update(&self.identity.id, &latest.raw, &proof)
            .await
            .map_err(FeedError::Submit)?;
        let stale = outcome.is_too_old();

        // Adopted even when stale: assumes this is the only feeder for the witness
        let snapshot =
            LogStateSnapshot::from_witness_response(outcome.into_state()).map_err(FeedError::Parse)?;
        let to = snapshot.tree_size();
        if stale {
            info!(log = %self.identity, submitted = latest_size, witness = to, "witness already had a newer STH");
        }

        self.snapshot = snapshot;
        Ok(RoundOutcome::Updated {
            from: witnessed,
            to,
            stale,
        })
    }
}

/// Feed loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedLoopState {
    Running,
    Stopped,
}

/// `true` on the channel, or a dropped sender, means stop
fn is_cancelled(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow() || shutdown.has_changed().is_err()
}

/// Wait for the next tick unless cancelled first
async fn wait_for_tick(
    ticker: &mut time::Interval,
    shutdown: &mut watch::Receiver<bool>,
) -> FeedLoopState {
    loop {
        if *shutdown.borrow_and_update() {
            return FeedLoopState::Stopped;
        }
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() {
                    return FeedLoopState::Stopped;
                }
            }
            _ = ticker.tick() => return FeedLoopState::Running,
        }
    }
}

/// Feed one log every `interval` until `shutdown` fires
///
/// Each round is bounded by `interval`. Failures are logged and retried on
/// the next tick. Returns the session once stopped.
pub async fn run_feed_loop(
    mut session: LogSession,
    witness: Arc<dyn Witness>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> LogSession {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut state = if is_cancelled(&shutdown) {
        FeedLoopState::Stopped
    } else {
        FeedLoopState::Running
    };

    while state == FeedLoopState::Running {
        let witnessed = session.witnessed_size();
        trace!(log = %session.identity, witnessed, "start feed round");

        let result = match time::timeout(interval, session.feed_once(witness.as_ref())).await {
            Ok(result) => result,
            Err(_) => Err(FeedError::DeadlineExceeded(interval)),
        };
        if let Err(e) = result {
            warn!(log = %session.identity, error = %e, "failed to feed");
        }

        trace!(log = %session.identity, witnessed = session.witnessed_size(), "feed round complete");
        state = wait_for_tick(&mut ticker, &mut shutdown).await;
    }

    debug!(log = %session.identity, "feed loop stopped");
    session
}
