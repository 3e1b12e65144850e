// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use offq_core::QueueItem;

use crate::replay::DrainOutcome;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Replay state label.
pub fn state_label(item: &QueueItem) -> &'static str {
    if item.synced {
        "synced"
    } else {
        "pending"
    }
}

fn format_ms(ms: i64) -> String {
    match chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ms) {
        Some(t) => t.format(TIME_FORMAT).to_string(),
        None => ms.to_string(),
    }
}

/// Format an item for list output: `- [action] key (state)`
pub fn format_item_line(item: &QueueItem) -> String {
    let mut line = format!(
        "- [{}] {} ({})",
        item.action,
        item.idempotency_key,
        state_label(item)
    );
    if !item.synced && item.attempts > 0 {
        line.push_str(&format!(", {} failed", item.attempts));
    }
    line
}

/// Format full item details for `show`.
pub fn format_item_details(item: &QueueItem) -> String {
    let mut output = Vec::new();

    output.push(format!("[{}] {}", item.action, item.idempotency_key));
    output.push(format!("State: {}", state_label(item)));
    output.push(format!("Created: {}", format_ms(item.created_at)));
    if let Some(synced_at) = item.synced_at {
        output.push(format!("Synced: {}", format_ms(synced_at)));
    }
    if item.attempts > 0 {
        output.push(format!("Failed attempts: {}", item.attempts));
    }
    if let Some(err) = &item.last_error {
        output.push(format!("Last error: {}", err));
    }

    output.push(String::new());
    output.push("Payload:".to_string());
    let payload = serde_json::to_string_pretty(&item.payload)
        .unwrap_or_else(|_| item.payload.to_string());
    for line in payload.lines() {
        output.push(format!("    {}", line));
    }

    output.join("\n")
}

/// One-line summary of a drain cycle.
pub fn format_drain_outcome(outcome: &DrainOutcome) -> String {
    match outcome {
        DrainOutcome::Offline => {
            "Offline: actions will replay when the remote is reachable".to_string()
        }
        DrainOutcome::AlreadyDraining => "Drain already in progress".to_string(),
        DrainOutcome::Drained { replayed: 0 } => "Nothing to replay".to_string(),
        DrainOutcome::Drained { replayed } => format!("Replayed {} action(s)", replayed),
        DrainOutcome::Aborted {
            replayed,
            key: Some(key),
            error,
        } => format!("Replayed {} action(s), stopped at {}: {}", replayed, key, error),
        DrainOutcome::Aborted {
            replayed,
            key: None,
            error,
        } => format!("Replayed {} action(s), stopped: {}", replayed, error),
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
