//! Fake CT logs, log list and witness, served over HTTP with axum

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::time::Instant;

use witness_feeder::core::UpdateRequest;
use witness_feeder::types::{DigitallySigned, SignedTreeHead};

pub fn sth(tree_size: u64) -> SignedTreeHead {
    SignedTreeHead {
        tree_size,
        timestamp: 1_700_000_000_000 + tree_size,
        sha256_root_hash: [(tree_size % 251) as u8; 32],
        tree_head_signature: DigitallySigned {
            hash_algorithm: 4,
            signature_algorithm: 3,
            signature: vec![0x30; 70],
        },
    }
}

pub fn sth_json(tree_size: u64) -> Vec<u8> {
    sth(tree_size).to_json()
}

/// Key bytes for a named test log
pub fn log_key(name: &str) -> Vec<u8> {
    format!("{name}-public-key").into_bytes()
}

/// Binary log ID for a named test log
pub fn log_id(name: &str) -> Vec<u8> {
    Sha256::digest(log_key(name)).to_vec()
}

/// Log ID as the witness sees it
pub fn log_id_b64(name: &str) -> String {
    STANDARD.encode(log_id(name))
}

/// Serve `router` on an ephemeral localhost port
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Poll `cond` until it holds, failing after 10 seconds
pub async fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

// =============================================================================
// LOGS
// =============================================================================

#[derive(Default)]
struct LogsState {
    sizes: HashMap<String, u64>,
    down: HashSet<String>,
    sth_requests: HashMap<String, usize>,
    proof_requests: Vec<(String, u64, u64)>,
}

/// CT logs served under `/logs/{name}/`
#[derive(Clone, Default)]
pub struct FakeLogs {
    inner: Arc<Mutex<LogsState>>,
}

#[derive(Deserialize)]
struct ConsistencyQuery {
    first: u64,
    second: u64,
}

impl FakeLogs {
    pub fn set_size(&self, name: &str, size: u64) {
        self.inner.lock().unwrap().sizes.insert(name.to_string(), size);
    }

    pub fn set_down(&self, name: &str, down: bool) {
        let mut state = self.inner.lock().unwrap();
        if down {
            state.down.insert(name.to_string());
        } else {
            state.down.remove(name);
        }
    }

    pub fn sth_requests(&self, name: &str) -> usize {
        self.inner.lock().unwrap().sth_requests.get(name).copied().unwrap_or(0)
    }

    pub fn proof_requests(&self) -> Vec<(String, u64, u64)> {
        self.inner.lock().unwrap().proof_requests.clone()
    }

    /// Base URL of a named log on a server started with [`FakeLogs::router`]
    pub fn url(addr: SocketAddr, name: &str) -> String {
        format!("http://{addr}/logs/{name}/")
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/logs/:name/ct/v1/get-sth", get(get_sth))
            .route("/logs/:name/ct/v1/get-sth-consistency", get(get_sth_consistency))
            .with_state(self.clone())
    }
}

async fn get_sth(State(logs): State<FakeLogs>, Path(name): Path<String>) -> Response {
    let mut state = logs.inner.lock().unwrap();
    *state.sth_requests.entry(name.clone()).or_default() += 1;
    if state.down.contains(&name) {
        return (StatusCode::SERVICE_UNAVAILABLE, "log unavailable").into_response();
    }
    match state.sizes.get(&name) {
        Some(size) => (StatusCode::OK, sth_json(*size)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_sth_consistency(
    State(logs): State<FakeLogs>,
    Path(name): Path<String>,
    Query(query): Query<ConsistencyQuery>,
) -> Response {
    let mut state = logs.inner.lock().unwrap();
    state.proof_requests.push((name.clone(), query.first, query.second));
    if state.down.contains(&name) {
        return (StatusCode::SERVICE_UNAVAILABLE, "log unavailable").into_response();
    }
    Json(serde_json::json!({
        "consistency": [
            STANDARD.encode([(query.first % 251) as u8; 32]),
            STANDARD.encode([(query.second % 251) as u8; 32]),
        ]
    }))
    .into_response()
}

// =============================================================================
// LOG LIST
// =============================================================================

/// v3 log list entry for a named test log
pub fn log_entry(addr: SocketAddr, name: &str, status: &str) -> serde_json::Value {
    let mut state = serde_json::Map::new();
    state.insert(
        status.to_string(),
        serde_json::json!({ "timestamp": "2024-01-01T00:00:00Z" }),
    );
    serde_json::json!({
        "description": name,
        "log_id": log_id_b64(name),
        "key": STANDARD.encode(log_key(name)),
        "url": FakeLogs::url(addr, name),
        "mmd": 86400,
        "state": state,
    })
}

/// Router serving `doc` at `/log_list.json`
pub fn log_list_router(doc: serde_json::Value) -> Router {
    Router::new().route(
        "/log_list.json",
        get(move || {
            let doc = doc.clone();
            async move { Json(doc) }
        }),
    )
}

// =============================================================================
// WITNESS
// =============================================================================

/// One update the witness received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpdate {
    pub log_id: String,
    pub size: u64,
    pub proof_len: usize,
}

#[derive(Default)]
struct WitnessState {
    held: HashMap<String, Vec<u8>>,
    updates: Vec<RecordedUpdate>,
    failing: bool,
}

/// Witness that keeps the newest STH per log
///
/// Rejects anything not newer with 409 and the held STH, and insists on a
/// proof once it holds a prior STH.
#[derive(Clone, Default)]
pub struct FakeWitness {
    inner: Arc<Mutex<WitnessState>>,
}

impl FakeWitness {
    /// Pretend another feeder already brought `log_id` to `size`
    pub fn seed(&self, log_id: &str, size: u64) {
        self.inner.lock().unwrap().held.insert(log_id.to_string(), sth_json(size));
    }

    pub fn held_size(&self, log_id: &str) -> Option<u64> {
        let state = self.inner.lock().unwrap();
        let raw = state.held.get(log_id)?;
        SignedTreeHead::from_json(raw).ok().map(|sth| sth.tree_size)
    }

    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.inner.lock().unwrap().updates.clone()
    }

    pub fn updates_for(&self, log_id: &str) -> Vec<RecordedUpdate> {
        self.updates().into_iter().filter(|u| u.log_id == log_id).collect()
    }

    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/witness/v0/logs/:log_id/update", put(update))
            .with_state(self.clone())
    }
}

async fn update(
    State(witness): State<FakeWitness>,
    Path(log_id): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> Response {
    let Ok((raw, proof)) = req.decode() else {
        return (StatusCode::BAD_REQUEST, "bad base64").into_response();
    };
    let Ok(new) = SignedTreeHead::from_json(&raw) else {
        return (StatusCode::BAD_REQUEST, "bad STH").into_response();
    };

    let mut state = witness.inner.lock().unwrap();
    if state.failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "witness broken").into_response();
    }
    state.updates.push(RecordedUpdate {
        log_id: log_id.clone(),
        size: new.tree_size,
        proof_len: proof.len(),
    });

    if let Some(held) = state.held.get(&log_id) {
        let held_size = SignedTreeHead::from_json(held).map(|sth| sth.tree_size).unwrap_or(0);
        if new.tree_size <= held_size {
            return (StatusCode::CONFLICT, held.clone()).into_response();
        }
        if proof.is_empty() {
            return (StatusCode::BAD_REQUEST, "missing consistency proof").into_response();
        }
    }

    state.held.insert(log_id, raw.clone());
    (StatusCode::OK, raw).into_response()
}
