use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use config_resolver::HttpConfig;
use ipc_fabric::Publisher;
use parking_lot::RwLock;
use tokio::sync::Mutex as AsyncMutex;

use crate::telemetry::TelemetrySnapshot;

/// Desired camera settings, read back by `GET /settings/camera` and updated
/// by `POST /settings/camera` (§4.8's ambient-supplement resolution).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CameraSettings {
    pub resolution_w: u32,
    pub resolution_h: u32,
    pub fps: u8,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self { resolution_w: 1280, resolution_h: 720, fps: 15 }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<AsyncMutex<Publisher>>,
    pub telemetry: Arc<RwLock<TelemetrySnapshot>>,
    pub camera_settings: Arc<RwLock<CameraSettings>>,
    /// Single-slot MJPEG stream arbitration flag (§4.8/P8).
    pub stream_held: Arc<AtomicBool>,
    pub http_cfg: HttpConfig,
}

impl AppState {
    pub fn new(upstream: Publisher, http_cfg: HttpConfig, history_len: usize) -> Self {
        Self {
            upstream: Arc::new(AsyncMutex::new(upstream)),
            telemetry: Arc::new(RwLock::new(TelemetrySnapshot::new(history_len))),
            camera_settings: Arc::new(RwLock::new(CameraSettings::default())),
            stream_held: Arc::new(AtomicBool::new(false)),
            http_cfg,
        }
    }

    pub async fn publish_upstream(&self, topic: &str, payload: &[u8]) {
        self.upstream.lock().await.publish(topic, payload).await;
    }
}
