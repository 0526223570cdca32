//! Wire message types and codec for the two IPC channels (upstream/downstream).
//!
//! Topics live in the ZMQ frame, not in an embedded JSON tag — callers look
//! up the decoded payload type by dispatching on topic string (see `codec`).

pub mod codec;
pub mod common;
pub mod downstream;
pub mod topics;
pub mod upstream;

pub use codec::{CodecError, decode_downstream, decode_upstream, encode};
pub use downstream::DownstreamMessage;
pub use upstream::UpstreamMessage;
