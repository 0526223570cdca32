use robot_core::VisionMode;

/// Camera-ownership state, mutated only between frame captures (§4.9: "must
/// be applied atomically between frames — never midway through a frame
/// acquisition"). `pending_mode`/`pending_paused` buffer an incoming command
/// until the frame loop finds itself between captures and can apply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerState {
    pub mode: VisionMode,
    pub streaming_enabled: bool,
    pub capture_in_progress: bool,
    pub paused: bool,
    pending_mode: Option<VisionMode>,
    pending_paused: Option<bool>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            mode: VisionMode::default(),
            streaming_enabled: false,
            capture_in_progress: false,
            paused: false,
            pending_mode: None,
            pending_paused: None,
        }
    }
}

impl ControllerState {
    /// Buffer a `cmd.vision.mode` command for application at the next
    /// between-frames checkpoint.
    pub fn request_mode(&mut self, mode: VisionMode) {
        self.pending_mode = Some(mode);
    }

    /// Buffer a `cmd.pause_vision` command. Pause is a derived signal (from
    /// the orchestrator's phase transitions) and must never override an
    /// operator-set `OFF` mode — applying it only ever touches `paused`,
    /// never `mode` itself, so an explicit OFF survives any pause/resume
    /// pair untouched.
    pub fn request_pause(&mut self, paused: bool) {
        self.pending_paused = Some(paused);
    }

    /// True if there is a buffered command waiting for a between-frames slot.
    pub fn has_pending(&self) -> bool {
        self.pending_mode.is_some() || self.pending_paused.is_some()
    }

    /// Apply any buffered command. Only ever called when `capture_in_progress`
    /// is false.
    pub fn apply_pending(&mut self) {
        debug_assert!(!self.capture_in_progress, "mode changes must land between frames");
        if let Some(mode) = self.pending_mode.take() {
            self.mode = mode;
        }
        if let Some(paused) = self.pending_paused.take() {
            self.paused = paused;
        }
        self.streaming_enabled = self.capture_enabled() && self.mode.streaming();
    }

    /// Whether the camera should currently be acquiring frames at all.
    pub fn capture_enabled(&self) -> bool {
        self.mode != VisionMode::Off && !self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_does_not_change_mode() {
        let mut s = ControllerState::default();
        s.request_mode(VisionMode::Off);
        s.apply_pending();
        s.request_pause(true);
        s.apply_pending();
        assert_eq!(s.mode, VisionMode::Off);
        assert!(!s.capture_enabled());

        s.request_pause(false);
        s.apply_pending();
        assert_eq!(s.mode, VisionMode::Off, "resuming pause must not flip an operator OFF back on");
        assert!(!s.capture_enabled());
    }

    #[test]
    fn pause_suspends_capture_without_clearing_mode() {
        let mut s = ControllerState::default();
        s.request_mode(VisionMode::OnWithStream);
        s.apply_pending();
        assert!(s.capture_enabled());
        assert!(s.streaming_enabled);

        s.request_pause(true);
        s.apply_pending();
        assert_eq!(s.mode, VisionMode::OnWithStream);
        assert!(!s.capture_enabled());
        assert!(!s.streaming_enabled);

        s.request_pause(false);
        s.apply_pending();
        assert!(s.capture_enabled());
        assert!(s.streaming_enabled);
    }

    #[test]
    fn streaming_enabled_requires_on_with_stream_mode() {
        let mut s = ControllerState::default();
        s.request_mode(VisionMode::On);
        s.apply_pending();
        assert!(s.capture_enabled());
        assert!(!s.streaming_enabled);
    }

    #[test]
    fn has_pending_reflects_buffered_commands() {
        let mut s = ControllerState::default();
        assert!(!s.has_pending());
        s.request_pause(true);
        assert!(s.has_pending());
        s.apply_pending();
        assert!(!s.has_pending());
    }
}
