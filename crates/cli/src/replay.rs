// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight replay of queued actions.
//!
//! A drain cycle takes exclusive ownership of the queue, then repeatedly
//! executes the earliest unsynced action and marks it synced. The first
//! failure ends the cycle; the failing action and everything after it stay
//! pending until the next trigger. There is no per-item retry here.
//!
//! ```text
//!            online && CAS(false→true)
//!   ┌──────┐ ───────────────────────────► ┌──────────┐
//!   │ Idle │                              │ Draining │ ──┐ next_unsynced
//!   └──────┘ ◄─────────────────────────── └──────────┘ ◄─┘ execute, mark_synced
//!             queue empty | any failure
//! ```
//!
//! Ownership is an in-process flag plus, for file-backed stores, an exclusive
//! lock on a sibling file. A trigger that finds the queue owned returns
//! [`DrainOutcome::AlreadyDraining`]; the owner rechecks the queue after
//! releasing ownership and runs again if anything arrived in between.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fs2::FileExt;
use offq_core::{Clock, QueueStore};

use crate::executor::{Executor, ExecutorError};
use crate::network::NetworkMonitor;

/// Observable state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainState {
    /// No cycle in flight.
    Idle,
    /// A cycle owns the queue.
    Draining,
}

/// Why a drain cycle stopped early.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// The executor failed to deliver an action.
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    /// The store could not be read or updated.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result of one call to [`ReplayEngine::drain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Not started: the monitor reports offline.
    Offline,
    /// Not started: another cycle already owns the queue.
    AlreadyDraining,
    /// The queue was emptied.
    Drained { replayed: usize },
    /// The cycle stopped at the first failure.
    Aborted {
        replayed: usize,
        /// Action being replayed when the failure hit, if one was loaded.
        key: Option<String>,
        error: ReplayError,
    },
}

impl DrainOutcome {
    /// Number of actions synced during the cycle.
    pub fn replayed(&self) -> usize {
        match self {
            DrainOutcome::Drained { replayed } | DrainOutcome::Aborted { replayed, .. } => {
                *replayed
            }
            DrainOutcome::Offline | DrainOutcome::AlreadyDraining => 0,
        }
    }
}

/// Sibling lock file that serializes drains across processes sharing a
/// database file.
pub fn drain_lock_path(db_path: &Path) -> PathBuf {
    db_path.with_extension("drain.lock")
}

/// Releases drain ownership when dropped, including on panic.
struct DrainGuard<'a> {
    flag: &'a AtomicBool,
    lock: Option<File>,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        // Closing the handle releases the file lock
        drop(self.lock.take());
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Drains unsynced actions through an executor.
pub struct ReplayEngine {
    store: Arc<QueueStore>,
    executor: Arc<dyn Executor>,
    monitor: Arc<NetworkMonitor>,
    clock: Arc<dyn Clock>,
    draining: AtomicBool,
    lock_path: Option<PathBuf>,
}

impl ReplayEngine {
    /// Create an idle engine.
    ///
    /// File-backed stores also take [`drain_lock_path`] for each cycle, so
    /// engines in different processes never replay the same action at once.
    pub fn new(
        store: Arc<QueueStore>,
        executor: Arc<dyn Executor>,
        monitor: Arc<NetworkMonitor>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let lock_path = store.path().map(drain_lock_path);
        ReplayEngine {
            store,
            executor,
            monitor,
            clock,
            draining: AtomicBool::new(false),
            lock_path,
        }
    }

    /// Current state.
    pub fn state(&self) -> DrainState {
        if self.draining.load(Ordering::SeqCst) {
            DrainState::Draining
        } else {
            DrainState::Idle
        }
    }

    /// Take ownership of the queue, or `None` if another cycle holds it.
    fn try_acquire(&self) -> std::io::Result<Option<DrainGuard<'_>>> {
        if self
            .draining
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(None);
        }
        let mut guard = DrainGuard {
            flag: &self.draining,
            lock: None,
        };

        if let Some(path) = &self.lock_path {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(path)?;
            if file.try_lock_exclusive().is_err() {
                tracing::debug!(path = %path.display(), "drain lock held by another process");
                return Ok(None);
            }
            guard.lock = Some(file);
        }
        Ok(Some(guard))
    }

    /// Run one drain cycle.
    ///
    /// Never returns an error: failures end the cycle and are reported in the
    /// outcome, leaving the queue consistent for the next trigger.
    pub async fn drain(&self) -> DrainOutcome {
        if !self.monitor.is_online() {
            tracing::debug!("offline, not draining");
            return DrainOutcome::Offline;
        }

        let mut replayed = 0;
        let mut owned_before = false;
        loop {
            let guard = match self.try_acquire() {
                Ok(Some(guard)) => guard,
                Ok(None) if owned_before => break,
                Ok(None) => {
                    tracing::debug!("drain already in flight");
                    return DrainOutcome::AlreadyDraining;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to open drain lock");
                    return DrainOutcome::Aborted {
                        replayed,
                        key: None,
                        error: ReplayError::Storage(e.to_string()),
                    };
                }
            };
            owned_before = true;

            if let Err(aborted) = self.replay_pending(&mut replayed).await {
                return aborted;
            }
            drop(guard);

            // A trigger turned away while we held ownership may have left
            // work behind
            match self.store.pending_count() {
                Ok(0) => break,
                Ok(pending) if self.monitor.is_online() => {
                    tracing::debug!(pending, "actions arrived as the cycle ended");
                }
                Ok(_) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to recheck queue after drain");
                    break;
                }
            }
        }

        if replayed > 0 {
            tracing::info!(replayed, "queue drained");
        }
        DrainOutcome::Drained { replayed }
    }

    /// Replay until the queue is empty, or return the aborted outcome.
    async fn replay_pending(&self, replayed: &mut usize) -> Result<(), DrainOutcome> {
        loop {
            // Re-read every iteration so actions enqueued mid-drain are seen
            let item = match self.store.next_unsynced() {
                Ok(Some(item)) => item,
                Ok(None) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        replayed = *replayed,
                        "failed to read queue, aborting drain"
                    );
                    return Err(DrainOutcome::Aborted {
                        replayed: *replayed,
                        key: None,
                        error: ReplayError::Storage(e.to_string()),
                    });
                }
            };
            let key = item.idempotency_key;

            if let Err(e) = self.executor.execute(&item.action, &item.payload, &key).await {
                tracing::warn!(
                    action = %item.action,
                    %key,
                    error = %e,
                    "replay failed, aborting drain"
                );
                if let Err(store_err) = self.store.record_failure(&key, &e.to_string()) {
                    tracing::warn!(%key, error = %store_err, "failed to record replay failure");
                }
                return Err(DrainOutcome::Aborted {
                    replayed: *replayed,
                    key: Some(key),
                    error: e.into(),
                });
            }

            // If this fails the action is replayed again later under the same
            // key, which the collaborator discards
            if let Err(e) = self.store.mark_synced(&key, self.clock.now_ms()) {
                tracing::warn!(%key, error = %e, "failed to mark action synced, aborting drain");
                return Err(DrainOutcome::Aborted {
                    replayed: *replayed,
                    key: Some(key),
                    error: ReplayError::Storage(e.to_string()),
                });
            }
            tracing::debug!(action = %item.action, %key, "action replayed");
            *replayed += 1;
        }
    }
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
