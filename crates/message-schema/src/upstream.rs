use serde::{Deserialize, Serialize};

use crate::common::{BoundingBox, ResponseDirection};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WwDetected {
    pub keyword: String,
    pub confidence: f64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttTranscription {
    pub text: String,
    pub confidence: f64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub durations_ms: Option<u64>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub request_id: String,
    pub speak: String,
    pub direction: ResponseDirection,
    #[serde(default)]
    pub track: Option<String>,
    #[serde(default)]
    pub raw: Option<serde_json::Value>,
    pub timestamp: i64,
}

/// `tts.speak` in its upstream, completion-reporting form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsCompletion {
    pub request_id: String,
    pub done: bool,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisnDetection {
    pub label: String,
    pub bbox: BoundingBox,
    pub confidence: f64,
    #[serde(default)]
    pub request_id: Option<String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EspSensor {
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub mq2: f64,
    pub lmotor: i32,
    pub rmotor: i32,
    pub min_distance: f64,
    pub obstacle: bool,
    pub warning: bool,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Collision,
    WarningZone,
    Clear,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EspAlert {
    pub kind: AlertKind,
    pub reason: String,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub timestamp: i64,
}

/// Emitted by the motor gateway whenever it Pi-side suppresses a `FORWARD`
/// command (§4.7's safety-violation prose).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavBlocked {
    pub reason: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteIntent {
    pub intent: String,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub extras: Option<serde_json::Value>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteHeartbeat {
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthEvent {
    pub ok: bool,
    pub timestamp: i64,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Every possible decoded upstream message, dispatched by topic (not by an
/// embedded tag field — the topic already lives in the ZMQ frame).
#[derive(Debug, Clone)]
pub enum UpstreamMessage {
    WwDetected(WwDetected),
    SttTranscription(SttTranscription),
    LlmResponse(LlmResponse),
    TtsCompletion(TtsCompletion),
    VisnDetection(VisnDetection),
    EspSensor(EspSensor),
    EspAlert(EspAlert),
    NavBlocked(NavBlocked),
    RemoteIntent(RemoteIntent),
    RemoteHeartbeat(RemoteHeartbeat),
    Health { service: String, event: HealthEvent },
}
