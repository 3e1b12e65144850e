// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Library-level offline to online scenario over real HTTP.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;

use std::sync::Arc;
use std::time::Duration;

use offqrs::config::{RemoteConfig, FORCE_LOGOUT};
use offqrs::executor::HttpExecutor;
use offqrs::network::NetworkMonitor;
use offqrs::{DrainOutcome, OfflineQueue, RetentionPolicy};
use serde_json::json;
use tokio_util::sync::CancellationToken;

fn open(path: &std::path::Path, url: &str, monitor: Arc<NetworkMonitor>) -> OfflineQueue {
    let remote = RemoteConfig {
        url: url.to_string(),
        ..RemoteConfig::default()
    };
    OfflineQueue::initialize(
        path,
        Arc::new(HttpExecutor::new(remote).unwrap()),
        monitor,
        &RetentionPolicy::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn force_logout_replayed_once_after_reconnect() {
    let remote = Remote::start().await;
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("queue.db");

    let monitor = Arc::new(NetworkMonitor::new(false));
    let queue = Arc::new(open(&db, &remote.url(), Arc::clone(&monitor)));
    let cancel = CancellationToken::new();
    let listener = Arc::clone(&queue).spawn_connectivity_listener(cancel.clone());

    let enqueued = queue
        .enqueue(FORCE_LOGOUT, json!({"agentId": "a1"}))
        .await
        .unwrap();
    assert!(enqueued.inserted);
    assert_eq!(enqueued.drain, None);
    assert!(remote.posts().is_empty());

    monitor.set_online(true);
    tokio::time::timeout(Duration::from_secs(5), async {
        while queue.pending_count().unwrap() > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("queue was never drained");

    let posts = remote.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].idempotency_key.as_deref(), Some(enqueued.key.as_str()));
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&posts[0].body).unwrap(),
        json!({"agentId": "a1"})
    );
    assert!(queue.item(&enqueued.key).unwrap().synced);

    cancel.cancel();
    listener.await.unwrap();
    drop(queue);

    // A fresh session over the same file has nothing left to send
    let queue = open(&db, &remote.url(), Arc::new(NetworkMonitor::new(true)));
    assert_eq!(queue.drain().await, DrainOutcome::Drained { replayed: 0 });
    assert_eq!(remote.posts().len(), 1);
}

#[tokio::test]
async fn rejected_action_stays_pending_across_restart() {
    let remote = Remote::start().await;
    remote.set_status(500);
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("queue.db");

    {
        let queue = open(&db, &remote.url(), Arc::new(NetworkMonitor::new(true)));
        let enqueued = queue
            .enqueue_with_key(FORCE_LOGOUT, json!({"agentId": "a1"}), "logout-a1")
            .await
            .unwrap();
        assert!(matches!(enqueued.drain, Some(DrainOutcome::Aborted { .. })));
    }

    remote.set_status(200);
    let queue = open(&db, &remote.url(), Arc::new(NetworkMonitor::new(true)));
    assert_eq!(queue.pending_count().unwrap(), 1);
    assert_eq!(queue.drain().await, DrainOutcome::Drained { replayed: 1 });

    // Same key on both attempts so the remote can discard the duplicate
    let keys: Vec<_> = remote
        .posts()
        .into_iter()
        .map(|r| r.idempotency_key.unwrap())
        .collect();
    assert_eq!(keys, vec!["logout-a1", "logout-a1"]);
}
