//! HTTP reachability probe that feeds a [`ConnectivityMonitor`] on hosts
//! without a platform connectivity broadcast.

use crate::cancel::CancellationToken;
use crate::config::NetworkConfig;
use crate::connectivity::monitor::{ConnectivityEvent, ConnectivityMonitor};
use crate::{RandomurError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Configuration for connectivity probing.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// URLs to probe, in order of preference.
    pub probe_urls: Vec<String>,
    /// Timeout for a single probe.
    pub probe_timeout: Duration,
    /// Delay between probe rounds.
    pub interval: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            probe_urls: vec![NetworkConfig::PROBE_URL.to_string()],
            probe_timeout: NetworkConfig::PROBE_TIMEOUT,
            interval: NetworkConfig::PROBE_INTERVAL,
        }
    }
}

/// Probes configured URLs with HEAD requests.
pub struct ConnectivityProbe {
    client: reqwest::Client,
    config: ProbeConfig,
}

impl ConnectivityProbe {
    pub fn new(config: ProbeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.probe_timeout)
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| RandomurError::transport("Failed to create probe client", e))?;
        Ok(Self { client, config })
    }

    /// Probe every URL until one answers. Returns whether any did.
    pub async fn check(&self) -> bool {
        for url in &self.config.probe_urls {
            if self.probe_url(url).await {
                return true;
            }
            debug!("Probe failed for {}", url);
        }
        false
    }

    async fn probe_url(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(resp) => {
                let status = resp.status();
                // A 403 still proves the host is reachable.
                status.is_success() || status.is_redirection() || status.as_u16() == 403
            }
            Err(e) => {
                debug!("Probe request failed: {}", e);
                false
            }
        }
    }

    /// Probe now and then every `interval`, reporting each result to
    /// `monitor` until `token` is cancelled.
    pub fn spawn(
        self,
        monitor: Arc<ConnectivityMonitor>,
        token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Starting connectivity probing");
            loop {
                let connected = tokio::select! {
                    _ = token.cancelled() => break,
                    connected = self.check() => connected,
                };
                monitor.report(ConnectivityEvent::Changed { connected });

                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(self.config.interval) => {}
                }
            }
            info!("Connectivity probing stopped");
        })
    }
}
