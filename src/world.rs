use parking_lot::RwLock;

use crate::phase::Phase;
use message_schema::common::WorldSnapshotWire;

/// Most-recent values of every field the orchestrator needs when building an
/// LLM request's `world` object. Mutated by sensor/vision event handlers;
/// read by copy. Invariant: reads are atomic with respect to any single
/// field's writes — enforced by taking the lock once per read or per write,
/// never field-by-field.
#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub mq2: f64,
    pub min_distance: f64,
    pub obstacle: bool,
    pub warning: bool,
    pub last_detection_label: Option<String>,
    pub last_detection_confidence: Option<f64>,
    pub phase: Phase,
    pub motor_enabled: bool,
}

impl Default for WorldSnapshot {
    fn default() -> Self {
        Self {
            s1: 0.0,
            s2: 0.0,
            s3: 0.0,
            mq2: 0.0,
            min_distance: 0.0,
            obstacle: false,
            warning: false,
            last_detection_label: None,
            last_detection_confidence: None,
            phase: Phase::Idle,
            motor_enabled: true,
        }
    }
}

impl WorldSnapshot {
    pub fn to_wire(&self) -> WorldSnapshotWire {
        WorldSnapshotWire {
            s1: self.s1,
            s2: self.s2,
            s3: self.s3,
            mq2: self.mq2,
            min_distance: self.min_distance,
            obstacle: self.obstacle,
            warning: self.warning,
            last_detection_label: self.last_detection_label.clone(),
            last_detection_confidence: self.last_detection_confidence,
            phase: self.phase.as_str().to_owned(),
            motor_enabled: self.motor_enabled,
        }
    }
}

/// Process-local, lock-protected world context store. Bounded memory, no
/// persistence. Cleared when the orchestrator enters ERROR; otherwise only
/// overwritten field-group by field-group.
#[derive(Debug, Default)]
pub struct WorldStore {
    inner: RwLock<WorldSnapshot>,
}

impl WorldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.inner.read().clone()
    }

    pub fn set_sensor(&self, s1: f64, s2: f64, s3: f64, mq2: f64, min_distance: f64, obstacle: bool, warning: bool) {
        let mut guard = self.inner.write();
        guard.s1 = s1;
        guard.s2 = s2;
        guard.s3 = s3;
        guard.mq2 = mq2;
        guard.min_distance = min_distance;
        guard.obstacle = obstacle;
        guard.warning = warning;
    }

    pub fn set_detection(&self, label: String, confidence: f64) {
        let mut guard = self.inner.write();
        guard.last_detection_label = Some(label);
        guard.last_detection_confidence = Some(confidence);
    }

    pub fn set_phase(&self, phase: Phase) {
        self.inner.write().phase = phase;
    }

    pub fn set_motor_enabled(&self, enabled: bool) {
        self.inner.write().motor_enabled = enabled;
    }

    /// Reset to defaults — called by the orchestrator on ERROR entry.
    pub fn clear(&self) {
        *self.inner.write() = WorldSnapshot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_has_no_obstacle() {
        let store = WorldStore::new();
        let snap = store.snapshot();
        assert!(!snap.obstacle);
        assert!(!snap.warning);
    }

    #[test]
    fn set_sensor_is_visible_in_next_snapshot() {
        let store = WorldStore::new();
        store.set_sensor(1.0, 2.0, 3.0, 0.1, 1.0, true, false);
        let snap = store.snapshot();
        assert_eq!(snap.s1, 1.0);
        assert!(snap.obstacle);
    }

    #[test]
    fn clear_resets_everything() {
        let store = WorldStore::new();
        store.set_sensor(1.0, 2.0, 3.0, 0.1, 1.0, true, true);
        store.set_detection("cup".to_owned(), 0.8);
        store.clear();
        let snap = store.snapshot();
        assert!(!snap.obstacle);
        assert!(snap.last_detection_label.is_none());
    }
}
