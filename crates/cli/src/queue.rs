// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The offline queue: durable enqueue plus replay on reconnect.
//!
//! [`OfflineQueue`] wires together the store, the replay engine, the network
//! monitor, and the pending-count sink. Callers enqueue actions regardless of
//! connectivity; if the monitor reports online the queue is drained right
//! away, otherwise the action waits for the next offline to online edge.

use std::path::Path;
use std::sync::Arc;

use offq_core::{derive_key, validate_key, Clock, QueueItem, QueueStore, SystemClock};
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::network::NetworkMonitor;
use crate::replay::{DrainOutcome, DrainState, ReplayEngine};
use crate::retention::{self, RetentionPolicy};
use crate::sink::{NoopSink, PendingSink};

/// Result of enqueueing one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enqueued {
    /// Idempotency key the action is stored under.
    pub key: String,
    /// `false` if an action with the same key was already queued.
    pub inserted: bool,
    /// Unsynced actions right after the append, if it could be counted.
    pub pending: Option<usize>,
    /// Outcome of the drain triggered by the enqueue, if online.
    pub drain: Option<DrainOutcome>,
}

/// Durable action queue with replay on reconnect.
pub struct OfflineQueue {
    store: Arc<QueueStore>,
    executor: Arc<dyn Executor>,
    monitor: Arc<NetworkMonitor>,
    sink: Arc<dyn PendingSink>,
    clock: Arc<dyn Clock>,
    engine: ReplayEngine,
}

impl OfflineQueue {
    /// Assemble a queue over an open store, using the system clock and no sink.
    pub fn new(
        store: QueueStore,
        executor: Arc<dyn Executor>,
        monitor: Arc<NetworkMonitor>,
    ) -> Self {
        let store = Arc::new(store);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let engine = ReplayEngine::new(
            Arc::clone(&store),
            Arc::clone(&executor),
            Arc::clone(&monitor),
            Arc::clone(&clock),
        );
        OfflineQueue {
            store,
            executor,
            monitor,
            sink: Arc::new(NoopSink),
            clock,
            engine,
        }
    }

    /// Open (or create) the store at `path`, apply retention, and assemble
    /// a queue over it. Pending actions from earlier sessions are kept.
    pub fn initialize(
        path: &Path,
        executor: Arc<dyn Executor>,
        monitor: Arc<NetworkMonitor>,
        retention: &RetentionPolicy,
    ) -> Result<Self> {
        let queue = Self::new(QueueStore::open(path)?, executor, monitor);
        queue.purge(retention)?;

        let pending = queue.pending_count()?;
        if pending > 0 {
            tracing::info!(pending, "restored pending actions");
        }
        Ok(queue)
    }

    /// Report pending counts to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn PendingSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Use `clock` for creation and sync timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.engine = ReplayEngine::new(
            Arc::clone(&self.store),
            Arc::clone(&self.executor),
            Arc::clone(&self.monitor),
            Arc::clone(&clock),
        );
        self.clock = clock;
        self
    }

    pub fn monitor(&self) -> &Arc<NetworkMonitor> {
        &self.monitor
    }

    pub fn store(&self) -> &QueueStore {
        &self.store
    }

    /// Whether a drain cycle is in flight.
    pub fn drain_state(&self) -> DrainState {
        self.engine.state()
    }

    /// Enqueue an action under a key derived from its content and the
    /// current time.
    pub async fn enqueue(&self, action: &str, payload: Value) -> Result<Enqueued> {
        let now = self.clock.now_ms();
        let key = derive_key(action, &payload, now);
        self.push(QueueItem::new(key, action, payload, now)).await
    }

    /// Enqueue an action under a caller-chosen idempotency key.
    ///
    /// Enqueueing the same key twice keeps only the first action.
    pub async fn enqueue_with_key(
        &self,
        action: &str,
        payload: Value,
        key: &str,
    ) -> Result<Enqueued> {
        validate_key(key)?;
        let now = self.clock.now_ms();
        self.push(QueueItem::new(key, action, payload, now)).await
    }

    /// Fail with [`Error::UnsupportedAction`] unless the executor can
    /// deliver `action`.
    pub fn check_action(&self, action: &str) -> Result<()> {
        if self.executor.supports(action) {
            Ok(())
        } else {
            Err(Error::UnsupportedAction {
                action: action.to_string(),
                known: self.executor.actions().join(", "),
            })
        }
    }

    async fn push(&self, item: QueueItem) -> Result<Enqueued> {
        self.check_action(&item.action)?;

        let inserted = self.store.append(&item)?;
        if inserted {
            tracing::debug!(action = %item.action, key = %item.idempotency_key, "action queued");
        }

        // The action is durable from here on; later failures are only logged
        let pending = self.notify_pending();
        let drain = if self.monitor.is_online() {
            Some(self.drain().await)
        } else {
            None
        };

        Ok(Enqueued {
            key: item.idempotency_key,
            inserted,
            pending,
            drain,
        })
    }

    /// Run one drain cycle and report the new pending count if it changed.
    pub async fn drain(&self) -> DrainOutcome {
        let outcome = self.engine.drain().await;
        if outcome.replayed() > 0 {
            self.notify_pending();
        }
        outcome
    }

    fn notify_pending(&self) -> Option<usize> {
        let count = match self.store.pending_count() {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "failed to count pending actions");
                return None;
            }
        };
        if let Err(e) = self.sink.notify_pending_count(count) {
            tracing::warn!(error = %e, "failed to report pending count");
        }
        Some(count)
    }

    /// Number of unsynced actions.
    pub fn pending_count(&self) -> Result<usize> {
        Ok(self.store.pending_count()?)
    }

    /// Queued actions in replay order.
    pub fn items(&self, include_synced: bool) -> Result<Vec<QueueItem>> {
        Ok(self.store.list(include_synced)?)
    }

    /// Look up one action by key.
    pub fn item(&self, key: &str) -> Result<QueueItem> {
        self.store
            .get(key)?
            .ok_or_else(|| Error::ItemNotFound(key.to_string()))
    }

    /// Apply a retention policy now.
    pub fn purge(&self, policy: &RetentionPolicy) -> Result<usize> {
        Ok(retention::purge(&self.store, policy, self.clock.now_ms())?)
    }

    /// Drain whenever the monitor goes from offline to online, until
    /// cancelled. Drains once at start if already online.
    pub fn spawn_connectivity_listener(
        self: Arc<Self>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let mut online_rx = self.monitor.subscribe();
        tokio::spawn(async move {
            if *online_rx.borrow_and_update() {
                self.drain().await;
            }

            // The monitor only notifies on transitions, so seeing online after
            // a notification means an offline period just ended
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = online_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        if *online_rx.borrow_and_update() {
                            tracing::info!("connectivity restored, draining queue");
                            let outcome = self.drain().await;
                            tracing::debug!(?outcome, "drain after reconnect finished");
                        }
                    }
                }
            }
            tracing::debug!("connectivity listener stopped");
        })
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
