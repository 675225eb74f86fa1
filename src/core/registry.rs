//! Log registry: fetch the log list and build a session per usable log
//!
//! Any failure here is fatal; a partial session list is never returned.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, info};

use crate::core::feeder::LogSession;
use crate::core::log_client::CtLogClient;
use crate::error::RegistryError;
use crate::types::{LogEntry, LogIdentity, LogList};

/// GET and parse the log list at `url`
pub async fn fetch_log_list(http: &reqwest::Client, url: &str) -> Result<LogList, RegistryError> {
    let response = http.get(url).send().await.map_err(RegistryError::Fetch)?;
    let status = response.status();
    if !status.is_success() {
        return Err(RegistryError::Status {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(RegistryError::Read)?;
    LogList::from_json(&body)
}

/// One session per usable log, each with its own client
pub fn populate_sessions(list: &LogList, http: &reqwest::Client) -> Result<Vec<LogSession>, RegistryError> {
    list.usable_logs()
        .map(|log| new_session(log, http))
        .collect()
}

fn new_session(log: &LogEntry, http: &reqwest::Client) -> Result<LogSession, RegistryError> {
    let log_id = decode(log, "log_id", &log.log_id)?;
    let key = decode(log, "key", &log.key)?;

    let client = CtLogClient::new(&log.url, &key, &log_id, http.clone()).map_err(|source| {
        RegistryError::ClientConstruction {
            log: log.description.clone(),
            source,
        }
    })?;
    debug!(log = %log.description, url = %client.base_url(), "created log client");

    Ok(LogSession::new(
        LogIdentity::new(&log_id, log.description.as_str()),
        Box::new(client),
    ))
}

fn decode(log: &LogEntry, field: &'static str, value: &str) -> Result<Vec<u8>, RegistryError> {
    STANDARD.decode(value).map_err(|source| RegistryError::Decode {
        log: log.description.clone(),
        field,
        source,
    })
}

/// Fetch the list at `url` and build sessions for it
pub async fn load_sessions(http: &reqwest::Client, url: &str) -> Result<Vec<LogSession>, RegistryError> {
    let list = fetch_log_list(http, url).await?;
    let sessions = populate_sessions(&list, http)?;
    info!(
        url,
        version = list.version.as_deref().unwrap_or("unknown"),
        usable = sessions.len(),
        "loaded log list"
    );
    Ok(sessions)
}
