use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct RawConfig {
    pub ipc: Option<RawIpc>,
    pub orchestrator: Option<RawOrchestrator>,
    pub motor: Option<RawMotor>,
    pub http: Option<RawHttp>,
    pub telemetry: Option<RawTelemetry>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawIpc {
    pub upstream: Option<String>,
    pub downstream: Option<String>,
    pub hwm: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawOrchestrator {
    pub stt_timeout_s: Option<u64>,
    pub llm_timeout_s: Option<u64>,
    pub tts_timeout_s: Option<u64>,
    pub remote_session_timeout_s: Option<u64>,
    pub auto_trigger_enabled: Option<bool>,
    pub auto_trigger_interval_s: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawMotor {
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub stop_distance_cm: Option<f64>,
    pub warning_distance_cm: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawHttp {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub allow_cidrs: Option<Vec<String>>,
    pub log_dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawTelemetry {
    pub history_len: Option<usize>,
}
