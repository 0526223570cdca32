use serde::{Deserialize, Serialize};

/// Navigation direction as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
    Scan,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Stop => "stop",
            Direction::Scan => "scan",
        }
    }
}

/// `llm.response.direction` additionally allows the empty string for "no motion intent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseDirection {
    Some(Direction),
    None(EmptyString),
}

/// Zero-sized marker that only deserializes from `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyString;

impl Serialize for EmptyString {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("")
    }
}

impl<'de> Deserialize<'de> for EmptyString {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            Ok(EmptyString)
        } else {
            Err(serde::de::Error::custom("expected empty string"))
        }
    }
}

impl ResponseDirection {
    pub fn as_direction(&self) -> Option<Direction> {
        match self {
            ResponseDirection::Some(d) => Some(*d),
            ResponseDirection::None(_) => None,
        }
    }
}

/// Axis-aligned bounding box `[x, y, w, h]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox(pub f64, pub f64, pub f64, pub f64);

/// Vision mode as carried on `cmd.vision.mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisionModeWire {
    Off,
    On,
    OnWithStream,
}

/// The `world` object embedded in `llm.request` — mirrors the world context
/// store's snapshot fields (see `robot_core::world`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshotWire {
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub mq2: f64,
    pub min_distance: f64,
    pub obstacle: bool,
    pub warning: bool,
    pub last_detection_label: Option<String>,
    pub last_detection_confidence: Option<f64>,
    pub phase: String,
    pub motor_enabled: bool,
}

/// Clamp a confidence-like value into `[0, 1]`. Producers call this before
/// publishing; consumers reject values outside range instead (see `codec`).
pub fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Clamp a distance-like value to be non-negative.
pub fn clamp_nonneg(v: f64) -> f64 {
    if v.is_sign_negative() { 0.0 } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_unit_bounds() {
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(0.42), 0.42);
    }

    #[test]
    fn clamp_nonneg_rejects_negative() {
        assert_eq!(clamp_nonneg(-3.0), 0.0);
        assert_eq!(clamp_nonneg(3.0), 3.0);
    }

    #[test]
    fn response_direction_roundtrips_empty() {
        let v: ResponseDirection = serde_json::from_str("\"\"").unwrap();
        assert_eq!(v.as_direction(), None);
        let v: ResponseDirection = serde_json::from_str("\"forward\"").unwrap();
        assert_eq!(v.as_direction(), Some(Direction::Forward));
    }
}
