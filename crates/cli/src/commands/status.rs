// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;

use offq_core::QueueStore;

use super::{open_workspace, Workspace};
use crate::cli::OutputFormat;
use crate::config::get_db_path;
use crate::error::Result;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusReport {
    remote: String,
    pending: usize,
    failing: usize,
    synced: usize,
    next: Option<String>,
}

pub fn run(output: OutputFormat) -> Result<()> {
    let ws = open_workspace()?;
    println!("{}", render(&ws, output)?);
    Ok(())
}

/// Summarize the queue without touching the network or applying retention.
pub(crate) fn report(ws: &Workspace) -> Result<StatusReport> {
    let store = QueueStore::open(&get_db_path(&ws.work_dir))?;
    let items = store.list(true)?;

    let (pending, synced): (Vec<_>, Vec<_>) = items.iter().partition(|i| !i.synced);
    Ok(StatusReport {
        remote: ws.config.remote.url.clone(),
        pending: pending.len(),
        failing: pending.iter().filter(|i| i.attempts > 0).count(),
        synced: synced.len(),
        next: pending.first().map(|i| i.idempotency_key.clone()),
    })
}

pub(crate) fn render(ws: &Workspace, output: OutputFormat) -> Result<String> {
    let report = report(ws)?;
    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let mut lines = vec![format!("Remote: {}", report.remote)];
            if report.failing > 0 {
                lines.push(format!("Pending: {} ({} failing)", report.pending, report.failing));
            } else {
                lines.push(format!("Pending: {}", report.pending));
            }
            lines.push(format!("Synced: {}", report.synced));
            if let Some(next) = &report.next {
                lines.push(format!("Next: {}", next));
            }
            Ok(lines.join("\n"))
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
