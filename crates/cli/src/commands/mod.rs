// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod drain;
pub mod enqueue;
pub mod init;
pub mod list;
pub mod probe;
pub mod purge;
pub mod show;
pub mod status;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{find_work_dir, get_db_path, Config};
use crate::error::{Error, Result};
use crate::executor::HttpExecutor;
use crate::network::{HttpHealthProbe, NetworkMonitor, ProbeLoop, ProbeResult};
use crate::queue::OfflineQueue;
use crate::retention::RetentionPolicy;
use crate::sink::LogSink;

/// An initialized `.offq/` directory and its configuration.
pub struct Workspace {
    pub work_dir: PathBuf,
    pub config: Config,
}

impl Workspace {
    /// Load the workspace at `work_dir`.
    pub fn load(work_dir: PathBuf) -> Result<Self> {
        let config = Config::load(&work_dir)?;
        Ok(Workspace { work_dir, config })
    }
}

/// Helper to find and load the workspace from the current context.
pub fn open_workspace() -> Result<Workspace> {
    Workspace::load(find_work_dir()?)
}

/// Open the queue with HTTP delivery, applying the configured retention.
pub fn open_queue(ws: &Workspace, monitor: Arc<NetworkMonitor>) -> Result<OfflineQueue> {
    open_queue_with(ws, monitor, &RetentionPolicy::from_config(&ws.config.retention))
}

/// Open the queue with HTTP delivery and an explicit retention policy.
pub fn open_queue_with(
    ws: &Workspace,
    monitor: Arc<NetworkMonitor>,
    retention: &RetentionPolicy,
) -> Result<OfflineQueue> {
    let executor =
        HttpExecutor::new(ws.config.remote.clone()).map_err(|e| Error::Config(e.to_string()))?;
    let db_path = get_db_path(&ws.work_dir);
    let queue = OfflineQueue::initialize(&db_path, Arc::new(executor), monitor, retention)?
        .with_sink(Arc::new(LogSink));
    Ok(queue)
}

/// Health probe for the configured remote.
pub fn health_probe(config: &Config) -> Result<HttpHealthProbe> {
    HttpHealthProbe::new(config.probe.health_url(&config.remote.url))
        .map_err(|e| Error::Config(e.to_string()))
}

/// Probe the remote once and record the result on `monitor`.
pub async fn probe_once(config: &Config, monitor: &Arc<NetworkMonitor>) -> Result<ProbeResult> {
    let probe = health_probe(config)?;
    let mut probe_loop = ProbeLoop::from_config(probe, Arc::clone(monitor), &config.probe);
    let (result, _) = probe_loop.check_once().await;
    Ok(result)
}

/// Runtime for commands that talk to the network.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e.to_string()))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
