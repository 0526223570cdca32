use std::time::{Duration, Instant};

use config_resolver::OrchestratorConfig;
use robot_core::{Event, Phase};

use crate::outstanding::Outstanding;

/// One iteration of the timeout/watchdog scheduler (§4.10). Runs after the
/// bounded-poll receive step in the orchestrator's main loop and inspects
/// exactly the four clocks named in the spec. Returns the recovery event to
/// feed into `next_phase`, if any single clock has expired.
pub fn check_phase_timeout(
    phase: Phase,
    outstanding: &Outstanding,
    now: Instant,
    cfg: &OrchestratorConfig,
) -> Option<Event> {
    match phase {
        Phase::Listening => outstanding.stt_started_at.and_then(|started| {
            expired(now, started, cfg.stt_timeout_s).then_some(Event::SttTimeout)
        }),
        Phase::Thinking => outstanding.llm_issued_at.and_then(|issued| {
            expired(now, issued, cfg.llm_timeout_s).then_some(Event::LlmTimeout)
        }),
        Phase::Speaking => outstanding.tts_issued_at.and_then(|issued| {
            expired(now, issued, cfg.tts_timeout_s).then_some(Event::TtsTimeout)
        }),
        Phase::Idle | Phase::Error => None,
    }
}

fn expired(now: Instant, since: Instant, timeout_s: u64) -> bool {
    now.saturating_duration_since(since) > Duration::from_secs(timeout_s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> OrchestratorConfig {
        OrchestratorConfig {
            stt_timeout_s: 15,
            llm_timeout_s: 45,
            tts_timeout_s: 20,
            remote_session_timeout_s: 30,
            auto_trigger_enabled: false,
            auto_trigger_interval_s: None,
        }
    }

    #[test]
    fn listening_times_out_after_stt_timeout() {
        let mut out = Outstanding::default();
        let t0 = Instant::now();
        out.start_listening("s1".into(), t0);
        let later = t0 + Duration::from_secs(16);
        assert_eq!(
            check_phase_timeout(Phase::Listening, &out, later, &cfg()),
            Some(Event::SttTimeout)
        );
    }

    #[test]
    fn listening_does_not_time_out_early() {
        let mut out = Outstanding::default();
        let t0 = Instant::now();
        out.start_listening("s1".into(), t0);
        let soon = t0 + Duration::from_secs(5);
        assert_eq!(check_phase_timeout(Phase::Listening, &out, soon, &cfg()), None);
    }

    #[test]
    fn idle_never_times_out() {
        let out = Outstanding::default();
        assert_eq!(
            check_phase_timeout(Phase::Idle, &out, Instant::now(), &cfg()),
            None
        );
    }
}
