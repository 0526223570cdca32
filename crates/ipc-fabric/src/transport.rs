/// A ZMQ endpoint string, built from either a TCP host/port pair or a raw
/// endpoint (e.g. `ipc://...`, used by tests to get an isolated namespace).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transport(String);

impl Transport {
    pub fn tcp(host: &str, port: u16) -> Self {
        Self(format!("tcp://{host}:{port}"))
    }

    /// An ephemeral TCP endpoint bound to an OS-assigned port, for tests.
    pub fn tcp_ephemeral(host: &str) -> Self {
        Self::tcp(host, 0)
    }

    pub fn raw(endpoint: impl Into<String>) -> Self {
        Self(endpoint.into())
    }

    pub fn endpoint(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tcp_endpoint_format() {
        assert_eq!(Transport::tcp("127.0.0.1", 5555).endpoint(), "tcp://127.0.0.1:5555");
    }

    #[test]
    fn raw_endpoint_passthrough() {
        assert_eq!(Transport::raw("ipc://foo").endpoint(), "ipc://foo");
    }
}
