// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub fn offq() -> Command {
    cargo_bin_cmd!("offq")
}

/// URL nothing listens on.
pub const DEAD_URL: &str = "http://127.0.0.1:1";

/// Helper to create an initialized temp directory whose remote is unreachable
pub fn init_temp() -> TempDir {
    init_temp_with(DEAD_URL)
}

/// Helper to create an initialized temp directory pointing at `url`
pub fn init_temp_with(url: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    offq()
        .arg("init")
        .arg("--url")
        .arg(url)
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to enqueue a FORCE_LOGOUT without replaying
pub fn enqueue_offline(temp: &TempDir, key: &str, agent: &str) {
    offq()
        .args(["enqueue", "FORCE_LOGOUT", "--no-drain", "--key", key])
        .arg("--payload")
        .arg(format!(r#"{{"agentId":"{}"}}"#, agent))
        .current_dir(temp.path())
        .assert()
        .success();
}

/// Request seen by [`Remote`].
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub idempotency_key: Option<String>,
    pub body: String,
}

#[derive(Default)]
struct RemoteState {
    requests: Mutex<Vec<Request>>,
    status: AtomicU16,
}

/// In-process HTTP server standing in for the remote.
pub struct Remote {
    addr: SocketAddr,
    state: Arc<RemoteState>,
}

impl Remote {
    pub async fn start() -> Self {
        let state = Arc::new(RemoteState {
            status: AtomicU16::new(200),
            ..RemoteState::default()
        });
        let app = Router::new().fallback(record).with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Remote { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_status(&self, status: u16) {
        self.state.status.store(status, Ordering::SeqCst);
    }

    /// Replayed actions, excluding health probes.
    pub fn posts(&self) -> Vec<Request> {
        self.state
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == "POST")
            .cloned()
            .collect()
    }
}

async fn record(
    State(state): State<Arc<RemoteState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    state.requests.lock().unwrap().push(Request {
        method: method.to_string(),
        path: uri.path().to_string(),
        idempotency_key: headers
            .get("idempotency-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    StatusCode::from_u16(state.status.load(Ordering::SeqCst)).unwrap()
}
