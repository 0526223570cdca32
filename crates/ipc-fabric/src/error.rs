use thiserror::Error;

#[derive(Debug, Error)]
pub enum FabricError {
    #[error("binding {0} failed: {1}")]
    Bind(String, zeromq::ZmqError),
    #[error("connecting to {0} failed: {1}")]
    Connect(String, zeromq::ZmqError),
    #[error("subscribe to prefix {0:?} failed: {1}")]
    Subscribe(String, zeromq::ZmqError),
    #[error("send failed: {0}")]
    Send(zeromq::ZmqError),
    #[error("receive failed: {0}")]
    Recv(zeromq::ZmqError),
}
