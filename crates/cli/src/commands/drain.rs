// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use super::{open_queue, open_workspace, probe_once, runtime, Workspace};
use crate::display::format_drain_outcome;
use crate::error::{Error, Result};
use crate::network::NetworkMonitor;
use crate::replay::DrainOutcome;

pub fn run() -> Result<()> {
    let ws = open_workspace()?;
    let output = runtime()?.block_on(run_impl(&ws))?;
    println!("{}", output);
    Ok(())
}

/// Probe once, then run a single drain cycle.
///
/// An aborted cycle is an error so scripts can tell that actions are still
/// waiting. An unreachable remote is not.
pub(crate) async fn run_impl(ws: &Workspace) -> Result<String> {
    let monitor = Arc::new(NetworkMonitor::default());
    let queue = open_queue(ws, Arc::clone(&monitor))?;

    if let Err(e) = probe_once(&ws.config, &monitor).await? {
        return Ok(format!(
            "Offline: {}\n{} pending",
            e,
            queue.pending_count()?
        ));
    }

    let outcome = queue.drain().await;
    if let DrainOutcome::Aborted { .. } = outcome {
        return Err(Error::Replay(format_drain_outcome(&outcome)));
    }
    Ok(format!(
        "{}\n{} pending",
        format_drain_outcome(&outcome),
        queue.pending_count()?
    ))
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
