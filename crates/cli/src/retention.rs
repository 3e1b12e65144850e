// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retention of synced actions.
//!
//! Synced actions are kept for a while so `offq list --all` can show what was
//! replayed, then purged. Pending actions are never purged.

use std::time::Duration;

use offq_core::QueueStore;

use crate::config::RetentionConfig;

/// How long synced actions are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Synced actions older than this are purged. `None` keeps them forever.
    pub synced_max_age: Option<Duration>,
}

impl RetentionPolicy {
    /// Keep synced actions forever.
    pub fn keep_forever() -> Self {
        RetentionPolicy {
            synced_max_age: None,
        }
    }

    /// Purge synced actions older than `max_age`.
    pub fn max_age(max_age: Duration) -> Self {
        RetentionPolicy {
            synced_max_age: Some(max_age),
        }
    }

    /// Policy described by configuration.
    pub fn from_config(config: &RetentionConfig) -> Self {
        RetentionPolicy {
            synced_max_age: config.synced_max_age(),
        }
    }

    /// Sync time before which actions are purged, if any.
    pub fn cutoff_ms(&self, now_ms: i64) -> Option<i64> {
        let age = self.synced_max_age?;
        let age_ms = i64::try_from(age.as_millis()).unwrap_or(i64::MAX);
        Some(now_ms.saturating_sub(age_ms))
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::from_config(&RetentionConfig::default())
    }
}

/// Apply a retention policy. Returns the number of actions removed.
pub fn purge(
    store: &QueueStore,
    policy: &RetentionPolicy,
    now_ms: i64,
) -> offq_core::Result<usize> {
    let Some(cutoff) = policy.cutoff_ms(now_ms) else {
        return Ok(0);
    };
    let removed = store.purge_synced_before(cutoff)?;
    if removed > 0 {
        tracing::info!(removed, "purged synced actions");
    }
    Ok(removed)
}

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;
