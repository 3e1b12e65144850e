// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{health_probe, open_queue, open_workspace, runtime, Workspace};
use crate::error::{Error, Result};
use crate::network::{NetworkMonitor, ProbeLoop};

pub fn run() -> Result<()> {
    let ws = open_workspace()?;
    runtime()?.block_on(run_impl(&ws, shutdown_signal()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c, run until killed");
        std::future::pending::<()>().await;
    }
}

/// Probe the remote on the backoff schedule and drain on every reconnect
/// until `shutdown` resolves.
pub(crate) async fn run_impl<F>(ws: &Workspace, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let monitor = Arc::new(NetworkMonitor::default());
    let queue = Arc::new(open_queue(ws, Arc::clone(&monitor))?);
    let probe = health_probe(&ws.config)?;

    tracing::info!(
        remote = %ws.config.remote.url,
        pending = queue.pending_count()?,
        "watching for connectivity"
    );

    let cancel = CancellationToken::new();
    let listener = Arc::clone(&queue).spawn_connectivity_listener(cancel.clone());
    let prober = tokio::spawn(
        ProbeLoop::from_config(probe, monitor, &ws.config.probe).run(cancel.clone()),
    );

    shutdown.await;
    tracing::info!("shutting down");
    cancel.cancel();

    // A drain in flight runs to completion before the listener exits
    listener.await.map_err(|e| Error::Runtime(e.to_string()))?;
    prober.await.map_err(|e| Error::Runtime(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
