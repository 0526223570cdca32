//! Publish/subscribe IPC fabric: two unidirectional channels built on ZMQ
//! PUB/SUB sockets, with topic-byte-prefix filtering and per-socket drop
//! counters. See `channel::Channel` for which process binds which side.

pub mod broker;
pub mod channel;
pub mod error;
pub mod metrics;
pub mod publisher;
pub mod subscriber;
pub mod transport;

pub use broker::{UpstreamBroker, derive_backend_endpoint};
pub use channel::{Channel, FabricConfig};
pub use error::FabricError;
pub use metrics::{FabricMetrics, FabricMetricsSnapshot};
pub use publisher::Publisher;
pub use subscriber::Subscriber;
pub use transport::Transport;
