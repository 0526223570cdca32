use std::time::Instant;

/// The orchestrator's outstanding-request markers — one per in-flight
/// sub-conversation. Cleared whenever the phase transitions away from the
/// state that owns them (§3 Phase invariant).
#[derive(Debug, Default)]
pub struct Outstanding {
    pub stt_session_id: Option<String>,
    pub stt_started_at: Option<Instant>,
    pub llm_request_id: Option<String>,
    pub llm_issued_at: Option<Instant>,
    pub tts_request_id: Option<String>,
    pub tts_issued_at: Option<Instant>,
}

impl Outstanding {
    pub fn start_listening(&mut self, session_id: String, now: Instant) {
        self.stt_session_id = Some(session_id);
        self.stt_started_at = Some(now);
    }

    pub fn clear_listening(&mut self) {
        self.stt_session_id = None;
        self.stt_started_at = None;
    }

    pub fn start_thinking(&mut self, request_id: String, now: Instant) {
        self.llm_request_id = Some(request_id);
        self.llm_issued_at = Some(now);
    }

    pub fn clear_thinking(&mut self) {
        self.llm_request_id = None;
        self.llm_issued_at = None;
    }

    pub fn start_speaking(&mut self, request_id: String, now: Instant) {
        self.tts_request_id = Some(request_id);
        self.tts_issued_at = Some(now);
    }

    pub fn clear_speaking(&mut self) {
        self.tts_request_id = None;
        self.tts_issued_at = None;
    }

    /// Clear every marker — used on `cmd.cancel_all` / ERROR entry.
    pub fn clear_all(&mut self) {
        self.clear_listening();
        self.clear_thinking();
        self.clear_speaking();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_clear_round_trip() {
        let mut out = Outstanding::default();
        out.start_thinking("r1".to_owned(), Instant::now());
        assert_eq!(out.llm_request_id.as_deref(), Some("r1"));
        out.clear_thinking();
        assert!(out.llm_request_id.is_none());
    }

    #[test]
    fn clear_all_clears_everything() {
        let mut out = Outstanding::default();
        let now = Instant::now();
        out.start_listening("s1".into(), now);
        out.start_thinking("r1".into(), now);
        out.start_speaking("r1".into(), now);
        out.clear_all();
        assert!(out.stt_session_id.is_none());
        assert!(out.llm_request_id.is_none());
        assert!(out.tts_request_id.is_none());
    }
}
