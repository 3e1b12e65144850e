// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Passive connectivity flag with change subscriptions.

use tokio::sync::watch;

/// Tracks whether the collaborator is believed reachable.
///
/// Any signal source calls [`NetworkMonitor::set_online`]; interested parties
/// call [`NetworkMonitor::subscribe`] and are woken on every transition.
#[derive(Debug)]
pub struct NetworkMonitor {
    online: watch::Sender<bool>,
}

impl NetworkMonitor {
    /// Create a monitor with the given initial state.
    pub fn new(initially_online: bool) -> Self {
        let (online, _) = watch::channel(initially_online);
        NetworkMonitor { online }
    }

    /// Current connectivity state.
    pub fn is_online(&self) -> bool {
        *self.online.borrow()
    }

    /// Record a connectivity signal.
    ///
    /// Returns `true` if this changed the state. Subscribers are only woken
    /// on a change.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.online.send_if_modified(|state| {
            if *state == online {
                false
            } else {
                *state = online;
                true
            }
        });
        if changed {
            tracing::info!(online, "connectivity changed");
        }
        changed
    }

    /// Subscribe to connectivity transitions.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.online.subscribe()
    }

    /// Human-readable state for status output.
    pub fn status_string(&self) -> &'static str {
        if self.is_online() {
            "online"
        } else {
            "offline"
        }
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
