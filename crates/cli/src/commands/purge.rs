// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use super::{open_queue_with, open_workspace, Workspace};
use crate::error::Result;
use crate::network::NetworkMonitor;
use crate::retention::RetentionPolicy;

pub fn run(older_than: Option<u64>) -> Result<()> {
    let ws = open_workspace()?;
    println!("{}", run_impl(&ws, older_than)?);
    Ok(())
}

/// Purge synced actions using `older_than` seconds, or the configured
/// retention when not given.
pub(crate) fn run_impl(ws: &Workspace, older_than: Option<u64>) -> Result<String> {
    let policy = match older_than {
        Some(secs) => RetentionPolicy::max_age(Duration::from_secs(secs)),
        None => RetentionPolicy::from_config(&ws.config.retention),
    };
    if policy.synced_max_age.is_none() {
        return Ok("Retention disabled; nothing purged".to_string());
    }

    let queue = open_queue_with(
        ws,
        Arc::new(NetworkMonitor::default()),
        &RetentionPolicy::keep_forever(),
    )?;
    let removed = queue.purge(&policy)?;
    Ok(format!("Purged {} synced action(s)", removed))
}

#[cfg(test)]
#[path = "purge_tests.rs"]
mod tests;
