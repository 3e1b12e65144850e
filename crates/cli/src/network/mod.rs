// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network state tracking.
//!
//! Two independent signal sources feed one connectivity flag:
//!
//! ```text
//! ┌──────────────┐  set_online  ┌────────────────┐  subscribe  ┌──────────────┐
//! │ platform /   │─────────────►│ NetworkMonitor │────────────►│ OfflineQueue │
//! │ ProbeLoop    │              │  (watch<bool>) │             │  (drains)    │
//! └──────────────┘              └────────────────┘             └──────────────┘
//! ```
//!
//! - [`NetworkMonitor`] holds the flag and publishes transitions
//! - [`ProbeLoop`] polls a health endpoint with bounded timeouts and
//!   exponential [`Backoff`] after failures

mod backoff;
mod monitor;
mod probe;

pub use backoff::Backoff;
pub use monitor::NetworkMonitor;
pub use probe::{HealthProbe, HttpHealthProbe, ProbeError, ProbeFuture, ProbeLoop, ProbeResult};
