// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use super::{open_workspace, probe_once, runtime, Workspace};
use crate::error::{Error, Result};
use crate::network::NetworkMonitor;

pub fn run() -> Result<()> {
    let ws = open_workspace()?;
    let output = runtime()?.block_on(run_impl(&ws))?;
    println!("{}", output);
    Ok(())
}

/// Probe the remote once. Unreachable is an error so the exit code can be
/// used in scripts.
pub(crate) async fn run_impl(ws: &Workspace) -> Result<String> {
    let monitor = Arc::new(NetworkMonitor::default());
    let url = ws.config.probe.health_url(&ws.config.remote.url);
    match probe_once(&ws.config, &monitor).await? {
        Ok(()) => Ok(format!("online: {}", url)),
        Err(e) => Err(Error::Unreachable(format!("{} ({})", e, url))),
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
