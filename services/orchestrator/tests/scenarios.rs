//! End-to-end FSM scenarios (happy path and the named edge cases), driven
//! entirely through `robot_core`'s pure pieces. No ZMQ sockets involved —
//! the orchestrator's IPC plumbing is exercised separately by the fabric
//! crate's own tests.

use robot_core::{Event, Phase, SessionManager, WorldSnapshot, next_phase, sanitize_direction};
use message_schema::common::Direction;

#[test]
fn happy_voice_turn_idle_to_speaking_and_back() {
    let mut phase = Phase::Idle;

    let (p, effects) = next_phase(phase, Event::Wakeword { suppressed: false });
    phase = p;
    assert_eq!(phase, Phase::Listening);
    assert!(effects.contains(&robot_core::Effect::ListenStart));

    let (p, effects) = next_phase(phase, Event::SttTranscription { guard_ok: true });
    phase = p;
    assert_eq!(phase, Phase::Thinking);
    assert!(effects.contains(&robot_core::Effect::EmitLlmRequest));

    let (p, effects) = next_phase(phase, Event::LlmResponse { id_matches: true });
    phase = p;
    assert_eq!(phase, Phase::Speaking);
    assert!(effects.contains(&robot_core::Effect::EmitTtsSpeak));

    let (p, _) = next_phase(phase, Event::TtsCompletion { done: true });
    phase = p;
    assert_eq!(phase, Phase::Idle);
}

#[test]
fn forward_suppressed_by_obstacle() {
    let mut world = WorldSnapshot::default();
    world.obstacle = true;
    let sanitized = sanitize_direction(Direction::Forward, &world);
    assert_eq!(sanitized, Direction::Stop);
}

#[test]
fn llm_stall_recovers_to_idle() {
    let (phase, effects) = next_phase(Phase::Thinking, Event::LlmTimeout);
    assert_eq!(phase, Phase::Idle);
    assert!(effects.contains(&robot_core::Effect::EmitError));
}

#[test]
fn stale_llm_response_is_dropped_silently() {
    let (phase, effects) = next_phase(Phase::Thinking, Event::LlmResponse { id_matches: false });
    assert_eq!(phase, Phase::Thinking);
    assert!(effects.is_empty());
}

#[test]
fn remote_stop_during_speaking_cancels_and_returns_idle() {
    let (phase, effects) = next_phase(Phase::Speaking, Event::RemoteStop { session_active: true });
    assert_eq!(phase, Phase::Idle);
    assert!(effects.contains(&robot_core::Effect::CancelAll));
    assert!(effects.contains(&robot_core::Effect::EmitNavStop));
}

#[test]
fn session_expiry_is_detected_exactly_once() {
    let mut session = SessionManager::new();
    let t0 = std::time::Instant::now();
    session.heartbeat(t0);
    let timeout = std::time::Duration::from_secs(5);

    let just_in_time = t0 + std::time::Duration::from_secs(3);
    assert!(!session.check_timeout(just_in_time, timeout));

    let expired = t0 + std::time::Duration::from_secs(10);
    assert!(session.check_timeout(expired, timeout));
    assert!(!session.check_timeout(expired, timeout), "must not fire twice");
}

#[test]
fn collision_while_listening_stops_listening_and_nav() {
    let (phase, effects) = next_phase(Phase::Listening, Event::Collision);
    assert_eq!(phase, Phase::Idle);
    assert!(effects.contains(&robot_core::Effect::ListenStop));
    assert!(effects.contains(&robot_core::Effect::EmitNavStop));
}
