use std::sync::Arc;
use std::time::Duration;

use zeromq::prelude::*;
use zeromq::SubSocket;

use crate::error::FabricError;
use crate::metrics::FabricMetrics;

/// A connected (or bound) SUB socket for one channel, filtered by
/// byte-prefix subscriptions.
pub struct Subscriber {
    socket: SubSocket,
    metrics: Arc<FabricMetrics>,
}

impl Subscriber {
    /// Connect to a bound publisher endpoint — the common case for every
    /// worker subscribing to its relevant channel.
    pub async fn connect(endpoint: &str) -> Result<Self, FabricError> {
        let mut socket = SubSocket::new();
        socket
            .connect(endpoint)
            .await
            .map_err(|e| FabricError::Connect(endpoint.to_owned(), e))?;
        Ok(Self {
            socket,
            metrics: Arc::new(FabricMetrics::new()),
        })
    }

    /// Bind — used only by a component acting as the channel's binder that
    /// also wants to observe the channel it owns (rare; the orchestrator
    /// normally binds a `Publisher`, not a `Subscriber`, per channel).
    pub async fn bind(endpoint: &str) -> Result<Self, FabricError> {
        let mut socket = SubSocket::new();
        socket
            .bind(endpoint)
            .await
            .map_err(|e| FabricError::Bind(endpoint.to_owned(), e))?;
        Ok(Self {
            socket,
            metrics: Arc::new(FabricMetrics::new()),
        })
    }

    pub fn metrics(&self) -> Arc<FabricMetrics> {
        self.metrics.clone()
    }

    /// Subscribe to every topic whose bytes start with `prefix` (pass `""`
    /// to receive everything).
    pub async fn subscribe(&mut self, prefix: &str) -> Result<(), FabricError> {
        self.socket
            .subscribe(prefix)
            .await
            .map_err(|e| FabricError::Subscribe(prefix.to_owned(), e))
    }

    /// Receive the next `(topic, payload)` pair, waiting up to `timeout`.
    /// Returns `Ok(None)` on timeout so the caller's bounded-poll loop can
    /// run its own periodic work (e.g. watchdog checks) in between.
    pub async fn recv(&mut self, timeout: Duration) -> Result<Option<(String, Vec<u8>)>, FabricError> {
        match tokio::time::timeout(timeout, self.socket.recv()).await {
            Ok(Ok(msg)) => {
                let frames: Vec<_> = msg.iter().collect();
                if frames.len() < 2 {
                    self.metrics.record_dropped();
                    return Ok(None);
                }
                let topic = String::from_utf8_lossy(frames[0].as_ref()).into_owned();
                let payload = frames[1].to_vec();
                self.metrics.record_received();
                Ok(Some((topic, payload)))
            }
            Ok(Err(e)) => Err(FabricError::Recv(e)),
            Err(_) => Ok(None),
        }
    }
}
