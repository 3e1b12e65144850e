// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! offq-core: Shared library for the offq action queue
//!
//! This crate provides the queued action record, idempotency key derivation,
//! the wall clock abstraction, and the SQLite-backed durable store used by
//! the offq replay engine.

pub mod clock;
pub mod error;
pub mod item;
pub mod key;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use item::QueueItem;
pub use key::{derive_key, validate_key};
pub use store::QueueStore;
