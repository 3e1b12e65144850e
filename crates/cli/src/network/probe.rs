// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Active health probing with bounded timeouts and adaptive backoff.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::backoff::Backoff;
use super::monitor::NetworkMonitor;
use crate::config::ProbeConfig;

/// Error type for health probes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    /// The probe exceeded its bound and was aborted.
    #[error("probe timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The request could not be sent.
    #[error("probe request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status.
    #[error("probe returned status {0}")]
    Status(u16),
}

/// Result type for health probes.
pub type ProbeResult = Result<(), ProbeError>;

/// Boxed future returned by [`HealthProbe::probe`].
pub type ProbeFuture<'a> = Pin<Box<dyn Future<Output = ProbeResult> + Send + 'a>>;

/// A single reachability check.
pub trait HealthProbe: Send + Sync {
    /// Check the endpoint once. Callers bound this with a timeout and drop
    /// the future when it expires.
    fn probe(&self) -> ProbeFuture<'_>;
}

/// Probe that issues `GET <url>` and expects a 2xx.
pub struct HttpHealthProbe {
    client: reqwest::Client,
    url: String,
}

impl HttpHealthProbe {
    /// Create a probe for the given URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ProbeError::Request(e.to_string()))?;
        Ok(HttpHealthProbe {
            client,
            url: url.into(),
        })
    }

    /// URL being probed.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl HealthProbe for HttpHealthProbe {
    fn probe(&self) -> ProbeFuture<'_> {
        Box::pin(async move {
            let response = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|e| ProbeError::Request(e.to_string()))?;
            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(ProbeError::Status(status.as_u16()))
            }
        })
    }
}

/// Periodic probe driving a [`NetworkMonitor`].
pub struct ProbeLoop<P: HealthProbe> {
    probe: P,
    monitor: Arc<NetworkMonitor>,
    backoff: Backoff,
    timeout: Duration,
}

impl<P: HealthProbe> ProbeLoop<P> {
    /// Create a loop with explicit schedule parameters.
    pub fn new(
        probe: P,
        monitor: Arc<NetworkMonitor>,
        backoff: Backoff,
        timeout: Duration,
    ) -> Self {
        ProbeLoop {
            probe,
            monitor,
            backoff,
            timeout,
        }
    }

    /// Create a loop using the schedule from configuration.
    pub fn from_config(probe: P, monitor: Arc<NetworkMonitor>, config: &ProbeConfig) -> Self {
        Self::new(
            probe,
            monitor,
            Backoff::new(config.base_delay(), config.max_delay()),
            config.timeout(),
        )
    }

    /// Current backoff state.
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// Run one bounded probe, update the monitor, and return the outcome
    /// with the delay before the next probe.
    pub async fn check_once(&mut self) -> (ProbeResult, Duration) {
        let result = match tokio::time::timeout(self.timeout, self.probe.probe()).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout(self.timeout)),
        };

        let delay = match &result {
            Ok(()) => {
                self.monitor.set_online(true);
                self.backoff.record_success()
            }
            Err(e) => {
                self.monitor.set_online(false);
                let delay = self.backoff.record_failure();
                tracing::debug!(
                    error = %e,
                    failures = self.backoff.failures(),
                    next = ?delay,
                    "health probe failed"
                );
                delay
            }
        };
        (result, delay)
    }

    /// Probe until cancelled.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            if cancel.is_cancelled() {
                return;
            }

            let probe_result = tokio::select! {
                _ = cancel.cancelled() => return,
                outcome = self.check_once() => outcome,
            };
            let (_, delay) = probe_result;

            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
