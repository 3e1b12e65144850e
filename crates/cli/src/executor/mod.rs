// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Action executor abstraction.
//!
//! An [`Executor`] turns one queued action into one call against the
//! transport collaborator. The replay engine only sees this trait, which
//! enables:
//! - Real HTTP delivery for production ([`HttpExecutor`])
//! - Scripted executors for unit testing

mod http;

pub use http::HttpExecutor;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde_json::Value;

/// Error type for executor operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    /// No route is configured for the action type.
    #[error("unknown action type '{0}'")]
    UnknownAction(String),

    /// The call did not complete within its bound.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The collaborator answered with a non-success status.
    #[error("collaborator returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Result type for executor operations.
pub type ExecResult<T> = Result<T, ExecutorError>;

/// Boxed future returned by [`Executor::execute`].
pub type ExecFuture<'a> = Pin<Box<dyn Future<Output = ExecResult<()>> + Send + 'a>>;

/// Maps a logical action type to a side effect on the transport collaborator.
pub trait Executor: Send + Sync {
    /// Returns true if this executor knows how to deliver `action`.
    fn supports(&self, action: &str) -> bool;

    /// Action types this executor can deliver, for diagnostics.
    fn actions(&self) -> Vec<String>;

    /// Deliver one action. Must fail with [`ExecutorError::UnknownAction`]
    /// rather than succeed silently when `action` is not supported.
    fn execute<'a>(&'a self, action: &'a str, payload: &'a Value, key: &'a str) -> ExecFuture<'a>;
}
