//! Topic name constants for the two IPC channels.
//!
//! Topics are plain strings on the wire (the first frame of a two-frame ZMQ
//! message); subscribers filter by byte prefix, so `"esp."` matches both
//! `esp.sensor` and `esp.alert`.

/// Upstream topics: workers -> orchestrator & HTTP adapter.
pub mod upstream {
    pub const WW_DETECTED: &str = "ww.detected";
    pub const STT_TRANSCRIPTION: &str = "stt.transcription";
    pub const LLM_RESPONSE: &str = "llm.response";
    pub const TTS_SPEAK: &str = "tts.speak";
    pub const VISN_DETECTION: &str = "visn.detection";
    pub const ESP_SENSOR: &str = "esp.sensor";
    pub const ESP_ALERT: &str = "esp.alert";
    pub const REMOTE_INTENT: &str = "remote.intent";
    pub const REMOTE_HEARTBEAT: &str = "remote.heartbeat";
    /// Named explicitly in §4.7's safety-violation prose though absent from
    /// the topic summary table; emitted by the motor gateway whenever a
    /// `FORWARD` command is Pi-side suppressed.
    pub const NAV_BLOCKED: &str = "nav.blocked";
    /// Prefix; the full topic is `health.<service>`.
    pub const HEALTH_PREFIX: &str = "health.";
}

/// Downstream topics: orchestrator -> workers.
pub mod downstream {
    pub const CMD_LISTEN_START: &str = "cmd.listen.start";
    pub const CMD_LISTEN_STOP: &str = "cmd.listen.stop";
    pub const CMD_PAUSE_VISION: &str = "cmd.pause_vision";
    pub const CMD_VISION_MODE: &str = "cmd.vision.mode";
    pub const LLM_REQUEST: &str = "llm.request";
    pub const TTS_SPEAK: &str = "tts.speak";
    pub const NAV_CMD: &str = "nav.cmd";
    pub const SESSION_REMOTE: &str = "session.remote";
    pub const CMD_CANCEL_ALL: &str = "cmd.cancel_all";
    pub const PHASE: &str = "phase";
}

/// Build the full `health.<service>` topic for a given service name.
pub fn health_topic(service: &str) -> String {
    format!("{}{service}", upstream::HEALTH_PREFIX)
}

/// True if `topic` matches `prefix` by byte comparison (ZMQ subscribe semantics).
pub fn matches_prefix(topic: &str, prefix: &str) -> bool {
    topic.as_bytes().starts_with(prefix.as_bytes())
}
