use std::sync::Arc;
use std::time::Duration;

use zeromq::prelude::*;
use zeromq::{PubSocket, ZmqMessage};

use crate::error::FabricError;
use crate::metrics::FabricMetrics;

/// Short grace period a publish is allowed to take before it is counted as
/// dropped — approximates the high-water-mark drop behavior of a real PUB
/// socket without depending on send-side blocking.
const PUBLISH_GRACE: Duration = Duration::from_millis(50);

/// A bound (or connected) PUB socket for one channel.
///
/// Exactly one process binds per channel (typically the orchestrator); every
/// other process connects. Both roles use this same type — only the setup
/// call differs.
pub struct Publisher {
    socket: PubSocket,
    metrics: Arc<FabricMetrics>,
}

impl Publisher {
    /// Bind this publisher's socket to `endpoint` — used by the channel binder.
    pub async fn bind(endpoint: &str) -> Result<Self, FabricError> {
        let mut socket = PubSocket::new();
        socket
            .bind(endpoint)
            .await
            .map_err(|e| FabricError::Bind(endpoint.to_owned(), e))?;
        Ok(Self {
            socket,
            metrics: Arc::new(FabricMetrics::new()),
        })
    }

    /// Connect this publisher's socket to a bound endpoint — used by every
    /// non-binder process (rare: most workers only subscribe, but the
    /// orchestrator's downstream publisher uses bind, and the HTTP adapter's
    /// occasional upstream re-publish — e.g. forwarding a derived event —
    /// uses connect).
    pub async fn connect(endpoint: &str) -> Result<Self, FabricError> {
        let mut socket = PubSocket::new();
        socket
            .connect(endpoint)
            .await
            .map_err(|e| FabricError::Connect(endpoint.to_owned(), e))?;
        Ok(Self {
            socket,
            metrics: Arc::new(FabricMetrics::new()),
        })
    }

    pub fn metrics(&self) -> Arc<FabricMetrics> {
        self.metrics.clone()
    }

    /// Publish `payload` under `topic`. Non-blocking in spirit: a send that
    /// does not complete within a short grace period is treated as dropped
    /// rather than stalling the caller's loop.
    pub async fn publish(&mut self, topic: &str, payload: &[u8]) {
        let mut frames = Vec::with_capacity(2);
        frames.push(bytes::Bytes::copy_from_slice(topic.as_bytes()));
        frames.push(bytes::Bytes::copy_from_slice(payload));
        let msg = match ZmqMessage::try_from(frames) {
            Ok(m) => m,
            Err(_) => {
                self.metrics.record_dropped();
                tracing::warn!(topic, "failed to build zmq message, dropping");
                return;
            }
        };

        match tokio::time::timeout(PUBLISH_GRACE, self.socket.send(msg)).await {
            Ok(Ok(())) => self.metrics.record_sent(),
            Ok(Err(e)) => {
                self.metrics.record_dropped();
                tracing::warn!(topic, error = %e, "publish failed, dropping");
            }
            Err(_) => {
                self.metrics.record_dropped();
                tracing::warn!(topic, "publish exceeded grace period, dropping");
            }
        }
    }
}
