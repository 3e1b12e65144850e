// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the offqrs library.
///
/// Replay failures are not represented here: the drain loop recovers from
/// them locally and reports them through [`crate::replay::DrainOutcome`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'offq init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("unsupported action '{action}'\n  hint: configured actions are: {known}")]
    UnsupportedAction { action: String, known: String },

    #[error("invalid payload: {0}\n  hint: the payload must be a JSON value, e.g. '{{\"agentId\":\"a1\"}}'")]
    InvalidPayload(String),

    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("remote unreachable: {0}")]
    Unreachable(String),

    #[error("replay failed: {0}")]
    Replay(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] offq_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("runtime error: {0}")]
    Runtime(String),
}

/// A specialized Result type for offqrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
