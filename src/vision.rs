/// Camera mode, mutated only through the vision mode controller under a
/// lock; each change is applied atomically between frames (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisionMode {
    Off,
    On,
    OnWithStream,
}

impl Default for VisionMode {
    fn default() -> Self {
        VisionMode::On
    }
}

impl VisionMode {
    pub fn streaming(self) -> bool {
        matches!(self, VisionMode::OnWithStream)
    }

    pub fn as_wire(self) -> message_schema::common::VisionModeWire {
        match self {
            VisionMode::Off => message_schema::common::VisionModeWire::Off,
            VisionMode::On => message_schema::common::VisionModeWire::On,
            VisionMode::OnWithStream => message_schema::common::VisionModeWire::OnWithStream,
        }
    }

    pub fn from_wire(wire: message_schema::common::VisionModeWire) -> Self {
        match wire {
            message_schema::common::VisionModeWire::Off => VisionMode::Off,
            message_schema::common::VisionModeWire::On => VisionMode::On,
            message_schema::common::VisionModeWire::OnWithStream => VisionMode::OnWithStream,
        }
    }
}
