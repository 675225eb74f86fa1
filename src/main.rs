//! witness-feeder CLI
//!
//! Usage:
//!   witness-feeder --witness-url http://localhost:8000
//!   witness-feeder --witness-url http://localhost:8000 --poll 30s
//!   witness-feeder --witness-url http://localhost:8000 --log-list-url https://example.com/log_list.json

use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn};

use witness_feeder::config::{parse_duration, FeederConfig};
use witness_feeder::core::run_feeder;
use witness_feeder::{telemetry, DEFAULT_LOG_LIST_URL, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "witness-feeder",
    version = VERSION,
    about = "Feed CT log STHs and consistency proofs to a witness",
    long_about = "Polls every usable log in the CT log list and pushes each new STH,\n\
                  with a consistency proof from the witness's last known size,\n\
                  to a witness over HTTP.\n\n\
                  Runs until interrupted (Ctrl-C)."
)]
struct Args {
    /// The location of the log list
    #[arg(long, default_value = DEFAULT_LOG_LIST_URL)]
    log_list_url: String,

    /// The endpoint of the witness HTTP API
    #[arg(long)]
    witness_url: String,

    /// How often to poll each log for updates (e.g. 10s, 500ms, 2m)
    #[arg(long, default_value = "10s", value_parser = parse_duration)]
    poll: Duration,

    /// Timeout for individual HTTP requests
    #[arg(long, value_parser = parse_duration)]
    request_timeout: Option<Duration>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    telemetry::init(&args.log_level);

    let config = FeederConfig {
        log_list_url: args.log_list_url,
        witness_url: args.witness_url,
        poll_interval: args.poll,
        request_timeout: args.request_timeout,
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, stopping feed loops");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                // Keep the sender alive so the loops keep running
                warn!(error = %e, "cannot listen for interrupt");
                std::future::pending::<()>().await;
            }
        }
    });

    info!(version = VERSION, witness = %config.witness_url, poll = ?config.poll_interval, "starting witness feeder");
    match run_feeder(&config, shutdown_rx).await {
        Ok(stopped) => info!(logs = stopped.len(), "all feed loops stopped"),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}
