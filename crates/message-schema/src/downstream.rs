use serde::{Deserialize, Serialize};

use crate::common::{Direction, VisionModeWire, WorldSnapshotWire};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmdListenStart {
    pub session_id: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmdListenStop {
    pub reason: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmdPauseVision {
    pub paused: bool,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmdVisionMode {
    pub mode: VisionModeWire,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub request_id: String,
    pub text: String,
    pub world: WorldSnapshotWire,
    pub timestamp: i64,
}

/// `tts.speak` in its downstream, request form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsSpeakRequest {
    pub request_id: String,
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavCmd {
    pub direction: Direction,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRemote {
    pub active: bool,
    pub last_seen: i64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmdCancelAll {
    pub reason: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub phase: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone)]
pub enum DownstreamMessage {
    CmdListenStart(CmdListenStart),
    CmdListenStop(CmdListenStop),
    CmdPauseVision(CmdPauseVision),
    CmdVisionMode(CmdVisionMode),
    LlmRequest(LlmRequest),
    TtsSpeakRequest(TtsSpeakRequest),
    NavCmd(NavCmd),
    SessionRemote(SessionRemote),
    CmdCancelAll(CmdCancelAll),
    Phase(PhaseEvent),
}
