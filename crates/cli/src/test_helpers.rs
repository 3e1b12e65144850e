// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers: scripted executor, recording sinks, and a local
//! collaborator HTTP server.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use serde_json::Value;

use crate::executor::{ExecFuture, Executor, ExecutorError};
use crate::sink::{PendingSink, SinkError};

/// One call observed by [`MockExecutor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub action: String,
    pub payload: Value,
    pub key: String,
}

/// Executor that records calls and fails on demand.
pub struct MockExecutor {
    actions: Vec<String>,
    calls: Mutex<Vec<Call>>,
    fail_keys: Mutex<HashSet<String>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockExecutor {
    /// Executor supporting the given action types.
    pub fn new(actions: &[&str]) -> Self {
        MockExecutor {
            actions: actions.iter().map(|a| a.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
            fail_keys: Mutex::new(HashSet::new()),
            delay: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Sleep for `delay` inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every call for `key` until [`MockExecutor::clear_failures`].
    pub fn fail_on(&self, key: &str) {
        self.fail_keys.lock().unwrap().insert(key.to_string());
    }

    pub fn clear_failures(&self) {
        self.fail_keys.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.key).collect()
    }

    /// Highest number of calls observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Executor for MockExecutor {
    fn supports(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }

    fn actions(&self) -> Vec<String> {
        self.actions.clone()
    }

    fn execute<'a>(&'a self, action: &'a str, payload: &'a Value, key: &'a str) -> ExecFuture<'a> {
        Box::pin(async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            self.calls.lock().unwrap().push(Call {
                action: action.to_string(),
                payload: payload.clone(),
                key: key.to_string(),
            });

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if !self.supports(action) {
                return Err(ExecutorError::UnknownAction(action.to_string()));
            }
            if self.fail_keys.lock().unwrap().contains(key) {
                return Err(ExecutorError::Request("mock failure".to_string()));
            }
            Ok(())
        })
    }
}

/// Sink that records every notification.
#[derive(Default)]
pub struct RecordingSink {
    counts: Mutex<Vec<usize>>,
}

impl RecordingSink {
    pub fn counts(&self) -> Vec<usize> {
        self.counts.lock().unwrap().clone()
    }
}

impl PendingSink for RecordingSink {
    fn notify_pending_count(&self, count: usize) -> Result<(), SinkError> {
        self.counts.lock().unwrap().push(count);
        Ok(())
    }
}

/// Sink that is never reachable.
pub struct FailingSink;

impl PendingSink for FailingSink {
    fn notify_pending_count(&self, _count: usize) -> Result<(), SinkError> {
        Err(SinkError("ui detached".to_string()))
    }
}

/// Request observed by [`Collaborator`].
#[derive(Debug, Clone)]
pub struct Received {
    pub method: String,
    pub path: String,
    pub idempotency_key: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Default)]
struct CollaboratorState {
    received: Mutex<Vec<Received>>,
    status: AtomicU16,
    post_status: AtomicU16,
    delay_ms: AtomicU64,
}

/// Local HTTP server standing in for the transport collaborator.
///
/// Answers every request with the configured status (200 by default) after
/// the configured delay, and records what it saw.
pub struct Collaborator {
    addr: SocketAddr,
    state: Arc<CollaboratorState>,
}

impl Collaborator {
    pub async fn start() -> Self {
        let state = Arc::new(CollaboratorState {
            status: AtomicU16::new(200),
            ..CollaboratorState::default()
        });
        let app = Router::new()
            .fallback(record)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Collaborator { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_status(&self, status: u16) {
        self.state.status.store(status, Ordering::SeqCst);
    }

    /// Answer POSTs with `status` while other requests keep the default.
    pub fn set_post_status(&self, status: u16) {
        self.state.post_status.store(status, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.state.delay_ms.store(millis, Ordering::SeqCst);
    }

    pub fn received(&self) -> Vec<Received> {
        self.state.received.lock().unwrap().clone()
    }

    /// Requests other than health probes.
    pub fn posts(&self) -> Vec<Received> {
        self.received()
            .into_iter()
            .filter(|r| r.method == "POST")
            .collect()
    }
}

async fn record(
    State(state): State<Arc<CollaboratorState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let is_post = method == Method::POST;
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.received.lock().unwrap().push(Received {
        method: method.to_string(),
        path: uri.path().to_string(),
        idempotency_key: header("idempotency-key"),
        content_type: header("content-type"),
        body,
    });

    let delay = state.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    let post_status = state.post_status.load(Ordering::SeqCst);
    let status = if is_post && post_status != 0 {
        post_status
    } else {
        state.status.load(Ordering::SeqCst)
    };
    StatusCode::from_u16(status).unwrap()
}
