// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! offqrs - A durable offline queue for side-effecting actions.
//!
//! This crate provides the core functionality for the `offq` CLI tool.
//! Actions are appended to a local SQLite queue under an idempotency key and
//! replayed in order against a remote collaborator once it is reachable.
//!
//! # Main Components
//!
//! - [`OfflineQueue`] - Enqueue, drain, and reconnect handling
//! - [`ReplayEngine`](replay::ReplayEngine) - Single-flight, fail-fast replay
//! - [`NetworkMonitor`](network::NetworkMonitor) - Connectivity flag with subscriptions
//! - [`Executor`](executor::Executor) - Delivery of one action ([`HttpExecutor`](executor::HttpExecutor))
//! - [`Config`] - Project configuration (remote, probe schedule, retention)
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use offqrs::{executor::HttpExecutor, network::NetworkMonitor, OfflineQueue, RetentionPolicy};
//!
//! let monitor = Arc::new(NetworkMonitor::default());
//! let executor = Arc::new(HttpExecutor::new(config.remote.clone())?);
//! let queue = OfflineQueue::initialize(&db_path, executor, monitor.clone(), &RetentionPolicy::default())?;
//!
//! queue.enqueue("FORCE_LOGOUT", serde_json::json!({"agentId": "a1"})).await?;
//! monitor.set_online(true); // a running connectivity listener drains here
//! ```

mod cli;
mod commands;
mod display;

pub mod config;
pub mod error;
pub mod executor;
pub mod network;
pub mod queue;
pub mod replay;
pub mod retention;
pub mod sink;

#[cfg(test)]
mod test_helpers;

pub use cli::{Cli, Command, OutputFormat};
pub use config::{find_work_dir, get_db_path, init_work_dir, Config};
pub use error::{Error, Result};
pub use queue::{Enqueued, OfflineQueue};
pub use replay::{DrainOutcome, DrainState};
pub use retention::RetentionPolicy;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init { url, path } => commands::init::run(url, path),
        Command::Enqueue {
            action,
            payload,
            key,
            no_drain,
        } => commands::enqueue::run(action, payload, key, no_drain),
        Command::Drain => commands::drain::run(),
        Command::Status { output } => commands::status::run(output),
        Command::List { all, output } => commands::list::run(all, output),
        Command::Show { key, output } => commands::show::run(&key, output),
        Command::Purge { older_than } => commands::purge::run(older_than),
        Command::Probe => commands::probe::run(),
        Command::Watch => commands::watch::run(),
    }
}

/// Default log filter for a command when `RUST_LOG` is not set.
///
/// `watch` is long-running and reports reconnects and replays at info; the
/// one-shot commands print their own summary and only log warnings.
pub fn default_log_filter(command: &Command) -> &'static str {
    match command {
        Command::Watch => "info",
        _ => "warn",
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
