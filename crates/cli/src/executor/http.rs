// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP delivery of queued actions.
//!
//! Each action is one `POST {url}{route}` carrying the payload as a JSON body
//! and the idempotency key in the `Idempotency-Key` header, so the
//! collaborator can discard replays it has already applied.

use serde_json::Value;

use super::{ExecFuture, ExecResult, Executor, ExecutorError};
use crate::config::RemoteConfig;

/// Header carrying the idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

/// Executor that POSTs actions to the configured collaborator routes.
pub struct HttpExecutor {
    client: reqwest::Client,
    remote: RemoteConfig,
}

impl HttpExecutor {
    /// Create an executor for the given collaborator configuration.
    pub fn new(remote: RemoteConfig) -> ExecResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(remote.request_timeout())
            .build()
            .map_err(|e| ExecutorError::Request(e.to_string()))?;
        Ok(HttpExecutor { client, remote })
    }

    async fn post(&self, url: String, payload: &Value, key: &str) -> ExecResult<()> {
        let response = self
            .client
            .post(&url)
            .header(IDEMPOTENCY_KEY_HEADER, key)
            .json(payload)
            .send()
            .await
            .map_err(|e| ExecutorError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut end = MAX_ERROR_BODY;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }
        Err(ExecutorError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl Executor for HttpExecutor {
    fn supports(&self, action: &str) -> bool {
        self.remote.routes.contains_key(action)
    }

    fn actions(&self) -> Vec<String> {
        self.remote.routes.keys().cloned().collect()
    }

    fn execute<'a>(&'a self, action: &'a str, payload: &'a Value, key: &'a str) -> ExecFuture<'a> {
        Box::pin(async move {
            let url = self
                .remote
                .action_url(action)
                .ok_or_else(|| ExecutorError::UnknownAction(action.to_string()))?;
            let bound = self.remote.request_timeout();

            tracing::debug!(%action, %key, %url, "delivering action");
            match tokio::time::timeout(bound, self.post(url, payload, key)).await {
                Ok(result) => result,
                Err(_) => Err(ExecutorError::Timeout(bound)),
            }
        })
    }
}
