use std::time::{Duration, Instant};

/// Single authoritative source of remote-operator session liveness. Lives
/// inside the orchestrator; the HTTP adapter only calls [`heartbeat`] and
/// mirrors the `session.remote` events the orchestrator publishes — it must
/// never independently declare the session dead (§4.5, §9 cyclic
/// relationship note).
///
/// [`heartbeat`]: SessionManager::heartbeat
#[derive(Debug)]
pub struct SessionManager {
    last_seen: Option<Instant>,
    active: bool,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self {
            last_seen: None,
            active: false,
        }
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a liveness signal — called whenever an authenticated HTTP
    /// request arrives at the adapter and is forwarded as `remote.heartbeat`.
    pub fn heartbeat(&mut self, now: Instant) {
        self.last_seen = Some(now);
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_seen(&self) -> Option<Instant> {
        self.last_seen
    }

    /// Check for session expiry. Returns `true` exactly once, on the
    /// transition from active to inactive — the caller publishes
    /// `session.remote{active:false}` only on that single `true`.
    pub fn check_timeout(&mut self, now: Instant, timeout: Duration) -> bool {
        if !self.active {
            return false;
        }
        let Some(last_seen) = self.last_seen else {
            return false;
        };
        if now.saturating_duration_since(last_seen) > timeout {
            self.active = false;
            true
        } else {
            false
        }
    }
}
