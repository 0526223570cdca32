mod capture;
mod mode;

use std::path::PathBuf;
use std::time::Duration;

use capture::{FrameSource, SimulatedFrameSource};
use ipc_fabric::{Publisher, Subscriber};
use message_schema::codec;
use message_schema::topics::{downstream as dtopic, health_topic};
use message_schema::upstream::HealthEvent;
use mode::ControllerState;
use robot_core::{ids, VisionMode};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Matches the orchestrator's bounded-poll cadence (§5) so mode/pause
/// commands are absorbed promptly without a busy loop.
const POLL_INTERVAL: Duration = Duration::from_millis(200);
/// Synthetic capture cadence; see `capture::SimulatedFrameSource`.
const FRAME_INTERVAL: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "vision mode controller starting");

    let project_root = std::env::var("PROJECT_ROOT").unwrap_or_else(|_| ".".to_owned());
    let base_path = std::env::var("ROBOT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/etc/robot/config.toml"));
    let override_path = std::env::var("ROBOT_CONFIG_OVERRIDE").ok().map(PathBuf::from);

    let cfg = match config_resolver::load(&base_path, override_path.as_deref(), &project_root) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("FATAL: config resolution failed: {e}");
            std::process::exit(1);
        }
    };

    let mut upstream = match Publisher::connect(&cfg.ipc.upstream).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("FATAL: cannot connect upstream publisher: {e}");
            std::process::exit(1);
        }
    };

    let mut downstream = match Subscriber::connect(&cfg.ipc.downstream).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("FATAL: cannot connect downstream subscriber: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = downstream.subscribe(dtopic::CMD_VISION_MODE).await {
        eprintln!("FATAL: cannot subscribe to cmd.vision.mode: {e}");
        std::process::exit(1);
    }
    if let Err(e) = downstream.subscribe(dtopic::CMD_PAUSE_VISION).await {
        eprintln!("FATAL: cannot subscribe to cmd.pause_vision: {e}");
        std::process::exit(1);
    }

    let mut state = ControllerState::default();
    let mut frame_source = SimulatedFrameSource::new(FRAME_INTERVAL);

    publish_health(&mut upstream, true, None).await;

    tracing::info!("vision mode controller entering main loop");
    loop {
        match downstream.recv(POLL_INTERVAL).await {
            Ok(Some((topic, payload))) => handle_downstream(&topic, &payload, &mut state),
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "downstream receive error");
                publish_health(&mut upstream, false, Some(e.to_string())).await;
            }
        }

        // Apply any buffered mode/pause command now — we are between frames
        // by construction, since nothing below ever awaits mid-capture.
        if state.has_pending() {
            state.apply_pending();
        }

        if state.capture_enabled() {
            state.capture_in_progress = true;
            let _ = frame_source.next_frame();
            state.capture_in_progress = false;
        }
    }
}

fn handle_downstream(topic: &str, payload: &[u8], state: &mut ControllerState) {
    let msg = match codec::decode_downstream(topic, payload) {
        Ok(m) => m,
        Err(e) => {
            warn!(topic, error = %e, "dropping unprocessable vision command");
            return;
        }
    };
    use message_schema::downstream::DownstreamMessage;
    match msg {
        DownstreamMessage::CmdVisionMode(cmd) => {
            state.request_mode(VisionMode::from_wire(cmd.mode));
        }
        DownstreamMessage::CmdPauseVision(cmd) => {
            state.request_pause(cmd.paused);
        }
        _ => {}
    }
}

async fn publish_health(upstream: &mut Publisher, ok: bool, detail: Option<String>) {
    let event = HealthEvent { ok, timestamp: ids::now_ts(), detail };
    let payload = codec::encode(&event);
    upstream.publish(&health_topic("vision_mode_controller"), &payload).await;
}
