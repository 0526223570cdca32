use crate::phase::Phase;

/// The orchestrator's input alphabet, already reduced to the guard outcome a
/// transition needs — e.g. `SttTranscription { guard_ok }` rather than the
/// raw confidence float, which the caller (the side-effecting dispatcher in
/// `services/orchestrator`) has already evaluated against config thresholds.
/// Keeping guards pre-evaluated is what makes `next_phase` a pure function
/// of `(Phase, Event)` per the Design Notes' "implicit global phase state"
/// strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Wakeword { suppressed: bool },
    RemoteStartListen { session_active: bool },
    SttTranscription { guard_ok: bool },
    SttTimeout,
    Collision,
    LlmResponse { id_matches: bool },
    LlmTimeout,
    TtsCompletion { done: bool },
    TtsTimeout,
    RemoteStop { session_active: bool },
}

/// Abstract side effects a transition requires. The dispatcher in
/// `services/orchestrator` maps each tag to a concrete downstream publish,
/// using the actual event payload (text, request_id, direction, ...) it
/// already holds — `next_phase` never sees that payload, only the guard
/// outcomes folded into `Event`.
///
/// Effects are returned in emission order; ordering rules (§4.6) — e.g.
/// `ListenStop` before `EmitLlmRequest` — are encoded by the order they
/// appear in each arm below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    PauseVision,
    ResumeVision,
    ListenStart,
    ListenStop,
    EmitLlmRequest,
    EmitTtsSpeak,
    EmitNavSanitized,
    EmitNavStop,
    CancelAll,
    EmitError,
}

/// A transition that the guard rejected, or whose event does not apply in
/// `from`, is a no-op: same phase, no effects.
pub fn next_phase(from: Phase, event: Event) -> (Phase, Vec<Effect>) {
    use Effect::*;
    use Phase::*;

    // Collision is handled regardless of phase (§4.6 "any" row), with an
    // extra `ListenStop` only when it interrupts an active LISTENING turn.
    if event == (Event::Collision) {
        return match from {
            Listening => (Idle, vec![ListenStop, EmitNavStop]),
            other => (other, vec![EmitNavStop]),
        };
    }

    if let Event::RemoteStop { session_active: true } = event {
        return (Idle, vec![CancelAll, EmitNavStop]);
    }

    match (from, event) {
        (Idle, Event::Wakeword { suppressed: false }) => {
            (Listening, vec![PauseVision, ListenStart])
        }
        (Idle, Event::RemoteStartListen { session_active: true }) => {
            (Listening, vec![PauseVision, ListenStart])
        }
        (Listening, Event::SttTranscription { guard_ok: true }) => {
            (Thinking, vec![ListenStop, EmitLlmRequest])
        }
        (Listening, Event::SttTranscription { guard_ok: false }) => {
            (Idle, vec![ListenStop, ResumeVision])
        }
        (Listening, Event::SttTimeout) => (Idle, vec![ListenStop, ResumeVision]),
        (Thinking, Event::LlmResponse { id_matches: true }) => {
            (Speaking, vec![EmitTtsSpeak, EmitNavSanitized])
        }
        (Thinking, Event::LlmResponse { id_matches: false }) => (Thinking, vec![]),
        (Thinking, Event::LlmTimeout) => (Idle, vec![EmitError, ResumeVision]),
        (Speaking, Event::TtsCompletion { done: true }) => (Idle, vec![ResumeVision]),
        (Speaking, Event::TtsCompletion { done: false }) => (Idle, vec![EmitError, ResumeVision]),
        (Speaking, Event::TtsTimeout) => (Idle, vec![EmitError, ResumeVision]),
        (other, _) => (other, vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Phase::*;

    #[test]
    fn wakeword_from_idle_enters_listening() {
        let (to, effects) = next_phase(Idle, Event::Wakeword { suppressed: false });
        assert_eq!(to, Listening);
        assert_eq!(effects, vec![Effect::PauseVision, Effect::ListenStart]);
    }

    #[test]
    fn suppressed_wakeword_is_noop() {
        let (to, effects) = next_phase(Idle, Event::Wakeword { suppressed: true });
        assert_eq!(to, Idle);
        assert!(effects.is_empty());
    }

    #[test]
    fn good_transcription_moves_to_thinking_stop_before_request() {
        let (to, effects) = next_phase(Listening, Event::SttTranscription { guard_ok: true });
        assert_eq!(to, Thinking);
        assert_eq!(effects, vec![Effect::ListenStop, Effect::EmitLlmRequest]);
    }

    #[test]
    fn bad_transcription_returns_to_idle() {
        let (to, effects) = next_phase(Listening, Event::SttTranscription { guard_ok: false });
        assert_eq!(to, Idle);
        assert_eq!(effects, vec![Effect::ListenStop, Effect::ResumeVision]);
    }

    #[test]
    fn collision_while_listening_stops_and_returns_idle() {
        let (to, effects) = next_phase(Listening, Event::Collision);
        assert_eq!(to, Idle);
        assert_eq!(effects, vec![Effect::ListenStop, Effect::EmitNavStop]);
    }

    #[test]
    fn collision_outside_listening_only_stops_nav() {
        let (to, effects) = next_phase(Thinking, Event::Collision);
        assert_eq!(to, Thinking);
        assert_eq!(effects, vec![Effect::EmitNavStop]);
    }

    #[test]
    fn mismatched_llm_response_is_dropped_silently() {
        let (to, effects) = next_phase(Thinking, Event::LlmResponse { id_matches: false });
        assert_eq!(to, Thinking);
        assert!(effects.is_empty());
    }

    #[test]
    fn matched_llm_response_moves_to_speaking() {
        let (to, effects) = next_phase(Thinking, Event::LlmResponse { id_matches: true });
        assert_eq!(to, Speaking);
        assert_eq!(effects, vec![Effect::EmitTtsSpeak, Effect::EmitNavSanitized]);
    }

    #[test]
    fn tts_failure_is_equivalent_to_done_false() {
        let (to, effects) = next_phase(Speaking, Event::TtsCompletion { done: false });
        assert_eq!(to, Idle);
        assert_eq!(effects, vec![Effect::EmitError, Effect::ResumeVision]);
    }

    #[test]
    fn remote_stop_from_any_phase_with_active_session() {
        let (to, effects) = next_phase(Speaking, Event::RemoteStop { session_active: true });
        assert_eq!(to, Idle);
        assert_eq!(effects, vec![Effect::CancelAll, Effect::EmitNavStop]);
    }

    #[test]
    fn remote_stop_without_session_is_noop() {
        let (to, effects) = next_phase(Speaking, Event::RemoteStop { session_active: false });
        assert_eq!(to, Speaking);
        assert!(effects.is_empty());
    }

    #[test]
    fn all_timeouts_recover_to_idle() {
        assert_eq!(next_phase(Listening, Event::SttTimeout).0, Idle);
        assert_eq!(next_phase(Thinking, Event::LlmTimeout).0, Idle);
        assert_eq!(next_phase(Speaking, Event::TtsTimeout).0, Idle);
    }
}
