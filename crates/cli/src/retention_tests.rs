// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use offq_core::QueueItem;
use serde_json::json;

const HOUR_MS: i64 = 60 * 60 * 1000;

fn synced(store: &QueueStore, key: &str, synced_at: i64) {
    store
        .append(&QueueItem::new(key, "FORCE_LOGOUT", json!({}), synced_at - 1))
        .unwrap();
    store.mark_synced(key, synced_at).unwrap();
}

#[test]
fn cutoff() {
    let policy = RetentionPolicy::max_age(Duration::from_secs(3600));
    assert_eq!(policy.cutoff_ms(10 * HOUR_MS), Some(9 * HOUR_MS));
    assert_eq!(RetentionPolicy::keep_forever().cutoff_ms(10 * HOUR_MS), None);
}

#[test]
fn default_keeps_a_week() {
    assert_eq!(
        RetentionPolicy::default().synced_max_age,
        Some(Duration::from_secs(7 * 24 * 3600))
    );
}

#[test]
fn purge_respects_age() {
    let store = QueueStore::open_in_memory().unwrap();
    synced(&store, "old", HOUR_MS);
    synced(&store, "recent", 9 * HOUR_MS + 1);
    store
        .append(&QueueItem::new("pending", "FORCE_LOGOUT", json!({}), 1))
        .unwrap();

    let policy = RetentionPolicy::max_age(Duration::from_secs(3600));
    assert_eq!(purge(&store, &policy, 10 * HOUR_MS).unwrap(), 1);

    assert!(store.get("old").unwrap().is_none());
    assert!(store.get("recent").unwrap().is_some());
    assert!(store.get("pending").unwrap().is_some());
}

#[test]
fn keep_forever_purges_nothing() {
    let store = QueueStore::open_in_memory().unwrap();
    synced(&store, "old", 1);

    assert_eq!(purge(&store, &RetentionPolicy::keep_forever(), i64::MAX).unwrap(), 0);
    assert!(store.get("old").unwrap().is_some());
}

#[test]
fn huge_age_does_not_underflow() {
    let policy = RetentionPolicy::max_age(Duration::from_secs(u64::MAX));
    assert_eq!(policy.cutoff_ms(0), Some(i64::MIN));
}
