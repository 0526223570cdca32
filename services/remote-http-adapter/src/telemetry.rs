use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ipc_fabric::Subscriber;
use message_schema::codec;
use message_schema::topics::downstream as dtopic;
use message_schema::upstream::{EspSensor, UpstreamMessage, VisnDetection};
use parking_lot::RwLock;
use robot_core::RingHistory;
use tracing::warn;

/// Copy-on-read aggregate served by `/status`, `/telemetry`, `/health`.
/// Built entirely by `run_consumer`'s background task; HTTP handlers only
/// ever take a read lock (§4.8: "HTTP handlers never acquire the IPC loop's
/// lock").
#[derive(Debug, serde::Serialize)]
pub struct TelemetrySnapshot {
    pub remote_session_active: bool,
    pub mode: String,
    pub vision_mode: String,
    pub stream_url: Option<String>,
    pub motor_enabled: bool,
    pub safety_stop: bool,
    pub sensor: Option<EspSensor>,
    pub sensor_buffer: Vec<EspSensor>,
    pub vision_last_detection: Option<VisnDetection>,
    pub detection_history: Vec<VisnDetection>,
    pub last_llm_response: Option<String>,
    pub last_tts_text: Option<String>,
    pub last_tts_status: Option<String>,
    pub health: HashMap<String, HealthStatus>,
    pub blocking_reason: Option<String>,
    pub remote_event: Option<String>,
    #[serde(skip)]
    history_len: usize,
    #[serde(skip)]
    sensor_history: RingHistory<EspSensor>,
    #[serde(skip)]
    detection_history_ring: RingHistory<VisnDetection>,
}

// `RingHistory` has no `Clone` impl (it wraps a lock), so the snapshot served
// to HTTP handlers is rebuilt from the already-materialized `Vec` fields
// rather than cloning the ring buffers themselves.
impl Clone for TelemetrySnapshot {
    fn clone(&self) -> Self {
        let sensor_history = RingHistory::new(self.history_len);
        for s in &self.sensor_buffer {
            sensor_history.push(s.clone());
        }
        let detection_history_ring = RingHistory::new(self.history_len);
        for d in &self.detection_history {
            detection_history_ring.push(d.clone());
        }
        Self {
            remote_session_active: self.remote_session_active,
            mode: self.mode.clone(),
            vision_mode: self.vision_mode.clone(),
            stream_url: self.stream_url.clone(),
            motor_enabled: self.motor_enabled,
            safety_stop: self.safety_stop,
            sensor: self.sensor.clone(),
            sensor_buffer: self.sensor_buffer.clone(),
            vision_last_detection: self.vision_last_detection.clone(),
            detection_history: self.detection_history.clone(),
            last_llm_response: self.last_llm_response.clone(),
            last_tts_text: self.last_tts_text.clone(),
            last_tts_status: self.last_tts_status.clone(),
            health: self.health.clone(),
            blocking_reason: self.blocking_reason.clone(),
            remote_event: self.remote_event.clone(),
            history_len: self.history_len,
            sensor_history,
            detection_history_ring,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthStatus {
    pub ok: bool,
    pub timestamp: i64,
    pub detail: Option<String>,
}

impl TelemetrySnapshot {
    pub fn new(history_len: usize) -> Self {
        Self {
            remote_session_active: false,
            mode: "IDLE".to_owned(),
            vision_mode: "on".to_owned(),
            stream_url: None,
            motor_enabled: true,
            safety_stop: false,
            sensor: None,
            sensor_buffer: Vec::new(),
            vision_last_detection: None,
            detection_history: Vec::new(),
            last_llm_response: None,
            last_tts_text: None,
            last_tts_status: None,
            health: HashMap::new(),
            blocking_reason: None,
            remote_event: None,
            history_len,
            sensor_history: RingHistory::new(history_len),
            detection_history_ring: RingHistory::new(history_len),
        }
    }

    fn derive_blocking_reason(&mut self) {
        self.blocking_reason = if self.safety_stop {
            Some("safety_stop".to_owned())
        } else if !self.remote_session_active {
            Some("no_session".to_owned())
        } else if self.mode != "IDLE" {
            Some("busy".to_owned())
        } else {
            None
        };
    }
}

/// Drains every upstream and downstream message into the shared snapshot.
/// Two long-lived `Subscriber`s, matching §5's "one thread draining the
/// telemetry subscriptions into a single lock-protected snapshot structure."
pub async fn run_upstream_consumer(mut sub: Subscriber, telemetry: Arc<RwLock<TelemetrySnapshot>>) {
    const POLL: Duration = Duration::from_millis(200);
    loop {
        match sub.recv(POLL).await {
            Ok(Some((topic, payload))) => apply_upstream(&topic, &payload, &telemetry),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "telemetry upstream receive error"),
        }
    }
}

pub async fn run_downstream_consumer(mut sub: Subscriber, telemetry: Arc<RwLock<TelemetrySnapshot>>) {
    const POLL: Duration = Duration::from_millis(200);
    loop {
        match sub.recv(POLL).await {
            Ok(Some((topic, payload))) => apply_downstream(&topic, &payload, &telemetry),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "telemetry downstream receive error"),
        }
    }
}

fn apply_upstream(topic: &str, payload: &[u8], telemetry: &Arc<RwLock<TelemetrySnapshot>>) {
    let msg = match codec::decode_upstream(topic, payload) {
        Ok(m) => m,
        Err(e) => {
            warn!(topic, error = %e, "telemetry dropping unprocessable upstream message");
            return;
        }
    };
    let mut snap = telemetry.write();
    match msg {
        UpstreamMessage::EspSensor(s) => {
            snap.safety_stop = s.obstacle || s.warning;
            snap.sensor_history.push(s.clone());
            snap.sensor = Some(s);
            snap.sensor_buffer = snap.sensor_history.snapshot();
        }
        UpstreamMessage::VisnDetection(d) => {
            snap.detection_history_ring.push(d.clone());
            snap.vision_last_detection = Some(d);
            snap.detection_history = snap.detection_history_ring.snapshot();
        }
        UpstreamMessage::LlmResponse(r) => {
            snap.last_llm_response = Some(r.speak);
        }
        UpstreamMessage::TtsCompletion(t) => {
            snap.last_tts_status = Some(if t.done { "done".to_owned() } else { "incomplete".to_owned() });
        }
        UpstreamMessage::RemoteIntent(i) => {
            snap.remote_event = Some(format!("intent:{}", i.intent));
        }
        UpstreamMessage::RemoteHeartbeat(_) => {
            snap.remote_session_active = true;
        }
        UpstreamMessage::Health { service, event } => {
            snap.health.insert(
                service,
                HealthStatus { ok: event.ok, timestamp: event.timestamp, detail: event.detail },
            );
        }
        UpstreamMessage::NavBlocked(b) => {
            snap.remote_event = Some(format!("nav_blocked:{}", b.reason));
        }
        UpstreamMessage::WwDetected(_) | UpstreamMessage::SttTranscription(_) | UpstreamMessage::EspAlert(_) => {}
    }
    snap.derive_blocking_reason();
}

fn apply_downstream(topic: &str, payload: &[u8], telemetry: &Arc<RwLock<TelemetrySnapshot>>) {
    use message_schema::downstream::DownstreamMessage;
    let msg = match codec::decode_downstream(topic, payload) {
        Ok(m) => m,
        Err(e) => {
            warn!(topic, error = %e, "telemetry dropping unprocessable downstream message");
            return;
        }
    };
    let mut snap = telemetry.write();
    match msg {
        DownstreamMessage::Phase(p) => snap.mode = p.phase,
        DownstreamMessage::CmdVisionMode(m) => {
            snap.vision_mode = format!("{:?}", m.mode).to_lowercase();
        }
        DownstreamMessage::SessionRemote(s) => snap.remote_session_active = s.active,
        DownstreamMessage::NavCmd(n) if n.direction == message_schema::common::Direction::Stop => {
            // Nothing derived from a bare STOP beyond what esp.sensor already drives.
        }
        _ if topic == dtopic::CMD_CANCEL_ALL => {
            snap.remote_event = Some("cancel_all".to_owned());
        }
        _ => {}
    }
    snap.derive_blocking_reason();
}
