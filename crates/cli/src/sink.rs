// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending-count notification sink.
//!
//! The queue reports how many actions are still waiting after every enqueue.
//! A sink that cannot be reached never fails the enqueue.

/// Error returned by a sink that could not deliver a notification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pending-count sink unavailable: {0}")]
pub struct SinkError(pub String);

/// Receiver of pending-count notifications (e.g. a UI badge).
pub trait PendingSink: Send + Sync {
    /// Report the current number of unsynced actions.
    fn notify_pending_count(&self, count: usize) -> Result<(), SinkError>;
}

/// Sink that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl PendingSink for NoopSink {
    fn notify_pending_count(&self, _count: usize) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Sink that logs notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl PendingSink for LogSink {
    fn notify_pending_count(&self, count: usize) -> Result<(), SinkError> {
        tracing::info!(pending = count, "pending actions");
        Ok(())
    }
}
