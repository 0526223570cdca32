use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use zeromq::prelude::*;
use zeromq::{PubSocket, SubSocket};

use crate::error::FabricError;
use crate::metrics::FabricMetrics;

/// Fan-out proxy for the upstream channel, where many workers publish and
/// both the orchestrator and the HTTP adapter need to consume — plain
/// ZMQ PUB/SUB only rendezvous one-binder-to-many-connecters in a single
/// direction, so the orchestrator additionally runs this small broker:
/// workers connect and publish to `frontend` (a bound SUB socket); every
/// consumer, including the orchestrator's own engine loop, connects to
/// `backend` (a bound PUB socket) to receive the re-published stream.
///
/// Modeled directly on an XPUB/XSUB-style proxy built from plain PUB/SUB
/// sockets (the `zeromq` crate has no XPUB/XSUB types).
pub struct UpstreamBroker {
    metrics: Arc<FabricMetrics>,
    shutdown: Arc<AtomicBool>,
}

impl UpstreamBroker {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(FabricMetrics::new()),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn metrics(&self) -> Arc<FabricMetrics> {
        self.metrics.clone()
    }

    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// Bind both sides and run the proxy loop until `shutdown` is set.
    pub async fn run(&self, frontend_endpoint: &str, backend_endpoint: &str) -> Result<(), FabricError> {
        let mut frontend = SubSocket::new();
        frontend
            .bind(frontend_endpoint)
            .await
            .map_err(|e| FabricError::Bind(frontend_endpoint.to_owned(), e))?;
        frontend
            .subscribe("")
            .await
            .map_err(|e| FabricError::Subscribe(String::new(), e))?;
        tracing::info!(endpoint = frontend_endpoint, "upstream broker frontend bound");

        let mut backend = PubSocket::new();
        backend
            .bind(backend_endpoint)
            .await
            .map_err(|e| FabricError::Bind(backend_endpoint.to_owned(), e))?;
        tracing::info!(endpoint = backend_endpoint, "upstream broker backend bound");

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            let recv = tokio::time::timeout(Duration::from_millis(100), frontend.recv()).await;
            let msg = match recv {
                Ok(Ok(msg)) => msg,
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "broker frontend recv error");
                    continue;
                }
                Err(_) => continue,
            };
            self.metrics.record_received();
            if let Err(e) = backend.send(msg).await {
                self.metrics.record_dropped();
                tracing::warn!(error = %e, "broker backend send error");
            } else {
                self.metrics.record_sent();
            }
        }
        Ok(())
    }
}

impl Default for UpstreamBroker {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the broker's backend endpoint from its frontend endpoint by
/// convention: same host, port + 1. Keeps the configuration surface limited
/// to the single `ipc.upstream` endpoint string named in §4.3 rather than
/// adding a second recognized config key for internal broker plumbing.
pub fn derive_backend_endpoint(frontend: &str) -> String {
    if let Some(rest) = frontend.strip_prefix("tcp://") {
        if let Some((host, port)) = rest.rsplit_once(':') {
            if let Ok(port_num) = port.parse::<u16>() {
                return format!("tcp://{host}:{}", port_num.wrapping_add(1));
            }
        }
    }
    format!("{frontend}-backend")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_backend_port_by_incrementing() {
        assert_eq!(
            derive_backend_endpoint("tcp://0.0.0.0:6000"),
            "tcp://0.0.0.0:6001"
        );
    }

    #[test]
    fn falls_back_to_suffix_for_non_tcp_endpoints() {
        assert_eq!(derive_backend_endpoint("ipc://foo"), "ipc://foo-backend");
    }
}
