// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Idempotency key derivation and validation.
//!
//! Derived keys have the form `{action}-{hash}-{timestamp}` where `hash` is the
//! first 16 hex chars of SHA256(action + NUL + payload JSON). The timestamp
//! makes every call unique, so two identical actions enqueued at different
//! times are replayed twice. Callers that want them collapsed must pass an
//! explicit key.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Maximum length of an idempotency key in bytes.
pub const MAX_KEY_LEN: usize = 255;

/// Hex-encoded content hash of an action and its payload.
pub fn content_hash(action: &str, payload: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(action.as_bytes());
    hasher.update([0u8]);
    // serde_json keeps object keys sorted, so equal payloads hash equally
    hasher.update(payload.to_string().as_bytes());
    let hash = hasher.finalize();
    hex::encode(&hash[..8])
}

/// Derive an idempotency key for an action enqueued at `timestamp_ms`.
pub fn derive_key(action: &str, payload: &Value, timestamp_ms: i64) -> String {
    format!("{}-{}-{}", action, content_hash(action, payload), timestamp_ms)
}

/// Validate a caller-supplied idempotency key.
///
/// Keys travel in an HTTP header, so they must be non-empty, bounded, and
/// free of whitespace and control characters.
pub fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        Some("cannot be empty")
    } else if key.len() > MAX_KEY_LEN {
        Some("longer than 255 bytes")
    } else if key.chars().any(char::is_whitespace) {
        Some("contains whitespace")
    } else if key.chars().any(char::is_control) {
        Some("contains control characters")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(Error::InvalidKey {
            key: key.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
#[path = "key_tests.rs"]
mod tests;
