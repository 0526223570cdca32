mod parser;
mod safety;
mod uart;

use std::convert::TryFrom;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use config_resolver::MotorConfig;
use ipc_fabric::{Publisher, Subscriber};
use message_schema::codec;
use message_schema::common::{Direction, clamp_nonneg};
use message_schema::downstream::DownstreamMessage;
use message_schema::topics::{downstream as dtopic, health_topic, upstream as utopic};
use message_schema::upstream::{AlertKind, EspAlert, EspSensor, HealthEvent, NavBlocked};
use parking_lot::Mutex as SyncMutex;
use parser::UartLine;
use robot_core::{SensorSample, ids};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

/// Poll interval for the `nav.cmd` drain loop, mirroring the orchestrator's
/// own bounded-poll discipline (§5) so the writer task stays responsive.
const NAV_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "motor gateway starting");

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

    let port = match uart::UartPort::open(&cfg.motor.port, cfg.motor.baud) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("FATAL: cannot open UART port {}: {e}", cfg.motor.port);
            std::process::exit(1);
        }
    };
    let (reader, writer) = port.split();

    let upstream = match Publisher::connect(&cfg.ipc.upstream).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("FATAL: cannot connect upstream publisher: {e}");
            std::process::exit(1);
        }
    };
    let upstream = Arc::new(AsyncMutex::new(upstream));

    let mut downstream = match Subscriber::connect(&cfg.ipc.downstream).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("FATAL: cannot connect downstream subscriber: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = downstream.subscribe(dtopic::NAV_CMD).await {
        eprintln!("FATAL: cannot subscribe to nav.cmd: {e}");
        std::process::exit(1);
    }

    let latest_sample: Arc<SyncMutex<Option<SensorSample>>> = Arc::new(SyncMutex::new(None));

    let reader_task = tokio::spawn(run_uart_reader(reader, upstream.clone(), latest_sample.clone()));
    let writer_task = tokio::spawn(run_nav_drain(
        downstream,
        writer,
        latest_sample,
        cfg.motor.clone(),
        upstream,
    ));

    let _ = tokio::join!(reader_task, writer_task);
}

async fn run_uart_reader(
    mut reader: uart::UartReader,
    upstream: Arc<AsyncMutex<Publisher>>,
    latest_sample: Arc<SyncMutex<Option<SensorSample>>>,
) {
    loop {
        match reader.read_line().await {
            Some(Ok(line)) => handle_uart_line(&line, &upstream, &latest_sample).await,
            Some(Err(e)) => {
                error!(error = %e, "UART read error");
                publish_health(&upstream, false, Some(e.to_string())).await;
            }
            None => {
                error!("UART stream closed");
                publish_health(&upstream, false, Some("uart stream closed".to_owned())).await;
                return;
            }
        }
    }
}

async fn handle_uart_line(
    line: &str,
    upstream: &Arc<AsyncMutex<Publisher>>,
    latest_sample: &Arc<SyncMutex<Option<SensorSample>>>,
) {
    let parsed = match UartLine::try_from(line) {
        Ok(p) => p,
        Err(e) => {
            warn!(line, error = %e, "dropping unparsable UART line");
            return;
        }
    };
    match parsed {
        UartLine::Data(d) => {
            // Producer side of §4.2's clamp/reject split: distances reported
            // by a noisy sensor never go upstream negative.
            let s1 = clamp_nonneg(d.s1);
            let s2 = clamp_nonneg(d.s2);
            let s3 = clamp_nonneg(d.s3);
            let min_distance = s1.min(s2).min(s3);
            let sample = SensorSample {
                s1,
                s2,
                s3,
                mq2: d.mq2,
                min_distance,
                obstacle: d.obstacle,
                warning: d.warning,
                motor_left: d.lmotor,
                motor_right: d.rmotor,
                ts: ids::now_ts(),
            };
            *latest_sample.lock() = Some(sample.clone());
            let wire = EspSensor {
                s1: sample.s1,
                s2: sample.s2,
                s3: sample.s3,
                mq2: sample.mq2,
                lmotor: sample.motor_left,
                rmotor: sample.motor_right,
                min_distance: sample.min_distance,
                obstacle: sample.obstacle,
                warning: sample.warning,
                timestamp: sample.ts,
            };
            let payload = codec::encode(&wire);
            upstream.lock().await.publish(utopic::ESP_SENSOR, &payload).await;
        }
        UartLine::Alert(a) => {
            let wire = EspAlert {
                kind: AlertKind::Collision,
                reason: a.reason,
                s1: clamp_nonneg(a.s1),
                s2: clamp_nonneg(a.s2),
                s3: clamp_nonneg(a.s3),
                timestamp: ids::now_ts(),
            };
            let payload = codec::encode(&wire);
            upstream.lock().await.publish(utopic::ESP_ALERT, &payload).await;
        }
        UartLine::Ack { cmd, status } => {
            // Parsed and logged only — §6 does not require acting on these.
            debug!(cmd, status, "UART ack");
        }
        UartLine::Unknown(line) => {
            warn!(line, "unknown UART line ignored");
        }
    }
}

async fn run_nav_drain(
    mut downstream: Subscriber,
    mut writer: uart::UartWriter,
    latest_sample: Arc<SyncMutex<Option<SensorSample>>>,
    motor_cfg: MotorConfig,
    upstream: Arc<AsyncMutex<Publisher>>,
) {
    loop {
        match downstream.recv(NAV_POLL_INTERVAL).await {
            Ok(Some((topic, payload))) if topic == dtopic::NAV_CMD => {
                let msg = match codec::decode_downstream(&topic, &payload) {
                    Ok(m) => m,
                    Err(e) => {
                        warn!(topic, error = %e, "dropping unprocessable nav.cmd");
                        continue;
                    }
                };
                let DownstreamMessage::NavCmd(nav) = msg else {
                    continue;
                };
                handle_nav_cmd(nav.direction, &mut writer, &latest_sample, &motor_cfg, &upstream).await;
            }
            Ok(Some(_)) => {}
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "downstream receive error");
            }
        }
    }
}

async fn handle_nav_cmd(
    direction: Direction,
    writer: &mut uart::UartWriter,
    latest_sample: &Arc<SyncMutex<Option<SensorSample>>>,
    motor_cfg: &MotorConfig,
    upstream: &Arc<AsyncMutex<Publisher>>,
) {
    if direction == Direction::Forward {
        let blocked = latest_sample
            .lock()
            .as_ref()
            .map(|s| safety::should_block_forward(s, motor_cfg.stop_distance_cm, motor_cfg.warning_distance_cm))
            .unwrap_or(false);
        if blocked {
            warn!("forward command suppressed by Pi-side safety check");
            let wire = NavBlocked {
                reason: "obstacle_or_warning".to_owned(),
                timestamp: ids::now_ts(),
            };
            let payload = codec::encode(&wire);
            upstream.lock().await.publish(utopic::NAV_BLOCKED, &payload).await;
            return;
        }
    }

    let line = safety::uart_command_for(direction);
    if let Err(e) = writer.write_line(line).await {
        error!(error = %e, command = line, "UART write failed, dropping command");
        publish_health(upstream, false, Some(e.to_string())).await;
    }
}

async fn publish_health(upstream: &Arc<AsyncMutex<Publisher>>, ok: bool, detail: Option<String>) {
    let event = HealthEvent { ok, timestamp: ids::now_ts(), detail };
    let payload = codec::encode(&event);
    upstream
        .lock()
        .await
        .publish(&health_topic("motor_gateway"), &payload)
        .await;
}
