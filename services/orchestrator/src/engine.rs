use std::time::Instant;

use config_resolver::OrchestratorConfig;
use ipc_fabric::Publisher;
use message_schema::codec::{self, CodecError};
use message_schema::common::{Direction, VisionModeWire};
use message_schema::downstream::{
    CmdCancelAll, CmdListenStart, CmdListenStop, CmdPauseVision, LlmRequest, NavCmd, PhaseEvent,
    SessionRemote, TtsSpeakRequest,
};
use message_schema::topics::downstream as dtopic;
use message_schema::upstream::UpstreamMessage;
use robot_core::{Effect, Event, Phase, SessionManager, WorldStore, ids, next_phase, sanitize_direction};

use crate::outstanding::Outstanding;
use crate::watchdog::check_phase_timeout;

/// STT confidence floor for the LISTENING -> THINKING guard. Not one of the
/// recognized config keys in §4.3 (only timeouts and thresholds the motor
/// gateway needs are configurable there); fixed here as a constant, per the
/// Open Question framing — a future version could promote this to config
/// without changing the FSM.
const MIN_STT_CONFIDENCE: f64 = 0.6;

/// Context carried alongside an `Event` so `apply_effects` can build the
/// concrete downstream payload each abstract `Effect` tag calls for, without
/// the pure `next_phase` function ever seeing message content.
#[derive(Debug, Default, Clone)]
struct EffectCtx {
    reason: Option<String>,
    llm_text: Option<String>,
    llm_speak: Option<String>,
    llm_direction: Option<Direction>,
}

pub struct Engine {
    phase: Phase,
    outstanding: Outstanding,
    session: SessionManager,
    world: WorldStore,
    cfg: OrchestratorConfig,
    downstream: Publisher,
    last_auto_trigger: Instant,
}

impl Engine {
    pub fn new(cfg: OrchestratorConfig, downstream: Publisher) -> Self {
        Self {
            phase: Phase::Idle,
            outstanding: Outstanding::default(),
            session: SessionManager::new(),
            world: WorldStore::new(),
            cfg,
            downstream,
            last_auto_trigger: Instant::now(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn world(&self) -> &WorldStore {
        &self.world
    }

    /// Decode and dispatch one upstream message. Decode errors are dropped
    /// with a log line at the codec boundary per §4.2/§7 — they never reach
    /// the FSM.
    pub async fn handle_upstream(&mut self, topic: &str, payload: &[u8]) {
        let msg = match codec::decode_upstream(topic, payload) {
            Ok(m) => m,
            Err(e) => {
                log_codec_error(topic, &e);
                return;
            }
        };
        self.dispatch(msg).await;
    }

    async fn dispatch(&mut self, msg: UpstreamMessage) {
        match msg {
            UpstreamMessage::WwDetected(_) => {
                self.transition(Event::Wakeword { suppressed: false }, EffectCtx::default())
                    .await;
            }
            UpstreamMessage::SttTranscription(t) => {
                let guard_ok = t.confidence >= MIN_STT_CONFIDENCE && !t.text.trim().is_empty();
                let ctx = EffectCtx {
                    llm_text: Some(t.text),
                    ..Default::default()
                };
                self.transition(Event::SttTranscription { guard_ok }, ctx).await;
            }
            UpstreamMessage::LlmResponse(r) => {
                let outstanding_id = self.outstanding.llm_request_id.clone();
                let id_matches = outstanding_id.as_deref() == Some(r.request_id.as_str());
                let ctx = EffectCtx {
                    llm_speak: Some(r.speak),
                    llm_direction: r.direction.as_direction(),
                    ..Default::default()
                };
                self.transition(Event::LlmResponse { id_matches }, ctx).await;
            }
            UpstreamMessage::TtsCompletion(t) => {
                self.transition(Event::TtsCompletion { done: t.done }, EffectCtx::default())
                    .await;
            }
            UpstreamMessage::EspSensor(s) => {
                // §3: motor_enabled is mutated by sensor events. The gateway
                // hard-stops both motors on an obstacle; anything else
                // reported alongside a live obstacle flag means the motors
                // are still being commanded and are therefore enabled.
                let motor_enabled = !(s.obstacle && s.lmotor == 0 && s.rmotor == 0);
                self.world.set_sensor(
                    s.s1,
                    s.s2,
                    s.s3,
                    s.mq2,
                    s.min_distance,
                    s.obstacle,
                    s.warning,
                );
                self.world.set_motor_enabled(motor_enabled);
            }
            UpstreamMessage::EspAlert(a) => {
                use message_schema::upstream::AlertKind;
                if a.kind == AlertKind::Collision {
                    self.transition(Event::Collision, EffectCtx::default()).await;
                }
            }
            UpstreamMessage::VisnDetection(d) => {
                self.world.set_detection(d.label, d.confidence);
            }
            UpstreamMessage::NavBlocked(_) => {
                // Informational only — the orchestrator does not react to
                // blocked commands beyond what `esp.sensor` already drives.
            }
            UpstreamMessage::RemoteIntent(intent) => {
                self.handle_remote_intent(intent).await;
            }
            UpstreamMessage::RemoteHeartbeat(_) => {
                self.session.heartbeat(Instant::now());
            }
            UpstreamMessage::Health { .. } => {}
        }
    }

    async fn handle_remote_intent(&mut self, intent: message_schema::upstream::RemoteIntent) {
        let session_active = self.session.is_active();
        match intent.intent.as_str() {
            "start_listen" => {
                self.transition(Event::RemoteStartListen { session_active }, EffectCtx::default())
                    .await;
            }
            "stop" => {
                self.transition(
                    Event::RemoteStop { session_active },
                    EffectCtx {
                        reason: Some("remote_stop".to_owned()),
                        ..Default::default()
                    },
                )
                .await;
            }
            "set_vision_mode" => {
                let mode = intent
                    .extras
                    .as_ref()
                    .and_then(|e| e.get("mode"))
                    .cloned()
                    .and_then(|v| serde_json::from_value::<VisionModeWire>(v).ok());
                match mode {
                    Some(mode) => self.set_vision_mode(mode).await,
                    None => tracing::warn!("set_vision_mode intent missing a valid extras.mode"),
                }
            }
            _ => {
                tracing::debug!(intent = intent.intent, "unhandled remote intent");
            }
        }
    }

    /// Run one watchdog iteration: check whichever single clock applies to
    /// the current phase, the session-liveness clock, and the auto-trigger
    /// interval, each independently.
    pub async fn run_watchdog(&mut self) {
        let now = Instant::now();
        if let Some(event) = check_phase_timeout(self.phase, &self.outstanding, now, &self.cfg) {
            self.transition(event, EffectCtx::default()).await;
        }
        let timeout = std::time::Duration::from_secs(self.cfg.remote_session_timeout_s);
        if self.session.check_timeout(now, timeout) {
            self.publish(
                dtopic::SESSION_REMOTE,
                &SessionRemote {
                    active: false,
                    last_seen: ids::now_ts(),
                    timestamp: ids::now_ts(),
                },
            )
            .await;
        }
        self.check_auto_trigger(now).await;
    }

    /// §4.6's auto-trigger: while IDLE, an elapsed `auto_trigger_interval_s`
    /// behaves exactly as if `ww.detected` had arrived — same guard, same
    /// effects — keeping the transition table the single source of truth.
    async fn check_auto_trigger(&mut self, now: Instant) {
        if !self.cfg.auto_trigger_enabled || self.phase != Phase::Idle {
            return;
        }
        let Some(interval_s) = self.cfg.auto_trigger_interval_s else {
            return;
        };
        let interval = std::time::Duration::from_secs(interval_s);
        if now.saturating_duration_since(self.last_auto_trigger) < interval {
            return;
        }
        self.last_auto_trigger = now;
        self.transition(Event::Wakeword { suppressed: false }, EffectCtx::default())
            .await;
    }

    async fn transition(&mut self, event: Event, ctx: EffectCtx) {
        let from = self.phase;
        let (to, effects) = next_phase(from, event);
        self.apply_effects(&effects, &ctx).await;
        if to != from {
            self.phase = to;
            self.world.set_phase(to);
            self.publish(
                dtopic::PHASE,
                &PhaseEvent {
                    phase: to.as_str().to_owned(),
                    timestamp: ids::now_ts(),
                },
            )
            .await;
        }
    }

    async fn apply_effects(&mut self, effects: &[Effect], ctx: &EffectCtx) {
        for effect in effects {
            match effect {
                Effect::PauseVision => {
                    self.publish(
                        dtopic::CMD_PAUSE_VISION,
                        &CmdPauseVision { paused: true, timestamp: ids::now_ts() },
                    )
                    .await;
                }
                Effect::ResumeVision => {
                    self.publish(
                        dtopic::CMD_PAUSE_VISION,
                        &CmdPauseVision { paused: false, timestamp: ids::now_ts() },
                    )
                    .await;
                }
                Effect::ListenStart => {
                    let session_id = ids::new_id();
                    self.outstanding.start_listening(session_id.clone(), Instant::now());
                    self.publish(
                        dtopic::CMD_LISTEN_START,
                        &CmdListenStart { session_id, timestamp: ids::now_ts() },
                    )
                    .await;
                }
                Effect::ListenStop => {
                    self.outstanding.clear_listening();
                    self.publish(
                        dtopic::CMD_LISTEN_STOP,
                        &CmdListenStop {
                            reason: ctx.reason.clone().unwrap_or_else(|| "ok".to_owned()),
                            timestamp: ids::now_ts(),
                        },
                    )
                    .await;
                }
                Effect::EmitLlmRequest => {
                    let request_id = ids::new_id();
                    self.outstanding.start_thinking(request_id.clone(), Instant::now());
                    let world = self.world.snapshot().to_wire();
                    self.publish(
                        dtopic::LLM_REQUEST,
                        &LlmRequest {
                            request_id,
                            text: ctx.llm_text.clone().unwrap_or_default(),
                            world,
                            timestamp: ids::now_ts(),
                        },
                    )
                    .await;
                }
                Effect::EmitTtsSpeak => {
                    self.outstanding.clear_thinking();
                    let request_id = ids::new_id();
                    self.outstanding.start_speaking(request_id.clone(), Instant::now());
                    self.publish(
                        dtopic::TTS_SPEAK,
                        &TtsSpeakRequest {
                            request_id,
                            text: ctx.llm_speak.clone().unwrap_or_default(),
                            voice: None,
                            timestamp: ids::now_ts(),
                        },
                    )
                    .await;
                }
                Effect::EmitNavSanitized => {
                    let world = self.world.snapshot();
                    let direction = ctx.llm_direction.unwrap_or(Direction::Stop);
                    let sanitized = sanitize_direction(direction, &world);
                    self.publish(
                        dtopic::NAV_CMD,
                        &NavCmd {
                            direction: sanitized,
                            speed: None,
                            duration_ms: None,
                            timestamp: ids::now_ts(),
                        },
                    )
                    .await;
                }
                Effect::EmitNavStop => {
                    self.publish(
                        dtopic::NAV_CMD,
                        &NavCmd {
                            direction: Direction::Stop,
                            speed: None,
                            duration_ms: None,
                            timestamp: ids::now_ts(),
                        },
                    )
                    .await;
                }
                Effect::CancelAll => {
                    self.outstanding.clear_all();
                    self.publish(
                        dtopic::CMD_CANCEL_ALL,
                        &CmdCancelAll {
                            reason: ctx.reason.clone().unwrap_or_else(|| "cancelled".to_owned()),
                            timestamp: ids::now_ts(),
                        },
                    )
                    .await;
                }
                Effect::EmitError => {
                    self.outstanding.clear_all();
                    tracing::warn!(phase = %self.phase, "orchestrator transitioning to IDLE after error/timeout");
                }
            }
        }
    }

    async fn publish(&mut self, topic: &str, msg: &impl serde::Serialize) {
        let payload = codec::encode(msg);
        self.downstream.publish(topic, &payload).await;
    }

    /// Force vision mode — used by startup and by a future `/settings`
    /// surface; not part of the FSM transition table itself.
    pub async fn set_vision_mode(&mut self, mode: VisionModeWire) {
        self.publish(
            dtopic::CMD_VISION_MODE,
            &message_schema::downstream::CmdVisionMode { mode, timestamp: ids::now_ts() },
        )
        .await;
    }
}

fn log_codec_error(topic: &str, err: &CodecError) {
    tracing::warn!(topic, error = %err, "dropping unprocessable upstream message");
}
