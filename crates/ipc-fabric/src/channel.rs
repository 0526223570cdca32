use crate::transport::Transport;

/// Which of the two unidirectional buses a socket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Workers publish events; orchestrator and HTTP adapter subscribe.
    Upstream,
    /// Orchestrator publishes commands; workers subscribe.
    Downstream,
}

/// Endpoints and policy for both channels, resolved from `config-resolver`'s
/// `ipc.*` keys.
#[derive(Debug, Clone)]
pub struct FabricConfig {
    pub upstream: Transport,
    pub downstream: Transport,
    /// Send/receive high-water-mark; default 1000 per §4.3.
    pub hwm: usize,
    /// Linger applied to every socket on close so process exit never blocks
    /// waiting for drained peers.
    pub linger: std::time::Duration,
}

impl FabricConfig {
    pub fn new(upstream: Transport, downstream: Transport) -> Self {
        Self {
            upstream,
            downstream,
            hwm: 1000,
            linger: std::time::Duration::from_millis(200),
        }
    }

    pub fn endpoint_for(&self, channel: Channel) -> &Transport {
        match channel {
            Channel::Upstream => &self.upstream,
            Channel::Downstream => &self.downstream,
        }
    }
}
