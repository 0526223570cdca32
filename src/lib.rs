//! Shared domain types for the robot assistant coordination substrate: the
//! orchestrator's phase machine, the world context store, the session
//! manager, and bounded sensor/detection history — everything that lives
//! inside a single process and does not cross the IPC fabric directly.

pub mod fsm;
pub mod ids;
pub mod phase;
pub mod sanitize;
pub mod sensor;
pub mod session;
pub mod vision;
pub mod world;

pub use fsm::{Effect, Event, next_phase};
pub use phase::Phase;
pub use sanitize::sanitize_direction;
pub use sensor::{RingHistory, SensorSample};
pub use session::SessionManager;
pub use vision::VisionMode;
pub use world::{WorldSnapshot, WorldStore};
