// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use serde_json::Value;

use super::{open_queue, open_workspace, probe_once, runtime, Workspace};
use crate::display::format_drain_outcome;
use crate::error::{Error, Result};
use crate::network::NetworkMonitor;

pub fn run(action: String, payload: String, key: Option<String>, no_drain: bool) -> Result<()> {
    let ws = open_workspace()?;
    let payload = parse_payload(&payload)?;
    let output = runtime()?.block_on(run_impl(&ws, &action, payload, key.as_deref(), !no_drain))?;
    println!("{}", output);
    Ok(())
}

/// Parse a command-line payload. Anything that is valid JSON is accepted.
pub(crate) fn parse_payload(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| Error::InvalidPayload(e.to_string()))
}

/// Internal implementation that accepts the workspace for testing.
///
/// When `drain` is set the remote is probed once first, so an enqueue while
/// reachable replays right away.
pub(crate) async fn run_impl(
    ws: &Workspace,
    action: &str,
    payload: Value,
    key: Option<&str>,
    drain: bool,
) -> Result<String> {
    let monitor = Arc::new(NetworkMonitor::default());
    let queue = open_queue(ws, Arc::clone(&monitor))?;
    queue.check_action(action)?;

    if drain {
        if let Err(e) = probe_once(&ws.config, &monitor).await? {
            tracing::debug!(error = %e, "remote unreachable, queueing only");
        }
    }

    let result = match key {
        Some(key) => queue.enqueue_with_key(action, payload, key).await?,
        None => queue.enqueue(action, payload).await?,
    };

    let mut lines = Vec::new();
    if result.inserted {
        lines.push(format!("Queued {}", result.key));
    } else {
        lines.push(format!("Already queued {}", result.key));
    }
    match &result.drain {
        Some(outcome) => lines.push(format_drain_outcome(outcome)),
        None if drain => {
            lines.push("Offline: action will replay when the remote is reachable".to_string())
        }
        None => {}
    }
    lines.push(format!("{} pending", queue.pending_count()?));
    Ok(lines.join("\n"))
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
