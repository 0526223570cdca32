use serde::{Deserialize, Serialize};

/// The orchestrator's top-level state variable. Mutated only by the
/// orchestrator; every external observer (tests, telemetry, the HTTP
/// adapter) reconstructs history from the `phase` events it emits on each
/// accepted transition rather than reading shared state directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Idle,
    Listening,
    Thinking,
    Speaking,
    Error,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "IDLE",
            Phase::Listening => "LISTENING",
            Phase::Thinking => "THINKING",
            Phase::Speaking => "SPEAKING",
            Phase::Error => "ERROR",
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_phase_is_idle() {
        assert_eq!(Phase::default(), Phase::Idle);
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(Phase::Listening.to_string(), "LISTENING");
    }
}
