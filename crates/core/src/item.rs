// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued action record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A side-effecting action waiting to be replayed, or already replayed.
///
/// Serializes with the wire field names (`idempotencyKey`, `createdAt`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// Unique identifier for this action. Primary key of the store.
    pub idempotency_key: String,
    /// Logical operation name, e.g. `FORCE_LOGOUT`.
    pub action: String,
    /// Operation arguments.
    pub payload: Value,
    /// True once the action has been executed successfully.
    pub synced: bool,
    /// Insertion time in milliseconds since Unix epoch. Defines replay order.
    pub created_at: i64,
    /// Time the action was marked synced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synced_at: Option<i64>,
    /// Number of failed replay attempts.
    #[serde(default)]
    pub attempts: u32,
    /// Error from the most recent failed attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl QueueItem {
    /// Creates a new unsynced item.
    pub fn new(
        idempotency_key: impl Into<String>,
        action: impl Into<String>,
        payload: Value,
        created_at: i64,
    ) -> Self {
        QueueItem {
            idempotency_key: idempotency_key.into(),
            action: action.into(),
            payload,
            synced: false,
            created_at,
            synced_at: None,
            attempts: 0,
            last_error: None,
        }
    }

    /// Insertion time as a UTC datetime.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.created_at)
    }

    /// Sync time as a UTC datetime.
    pub fn synced_at_utc(&self) -> Option<DateTime<Utc>> {
        self.synced_at.and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
