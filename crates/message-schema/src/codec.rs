use serde_json::Value;
use thiserror::Error;

use crate::downstream::{
    CmdCancelAll, CmdListenStart, CmdListenStop, CmdPauseVision, CmdVisionMode, DownstreamMessage,
    LlmRequest, NavCmd, PhaseEvent, SessionRemote, TtsSpeakRequest,
};
use crate::topics::{downstream as dtopic, upstream as utopic};
use crate::upstream::{
    EspAlert, EspSensor, HealthEvent, LlmResponse, NavBlocked, RemoteHeartbeat, RemoteIntent,
    SttTranscription, TtsCompletion, UpstreamMessage, VisnDetection, WwDetected,
};

/// Decoding/validation failure. All variants are "log + drop", never a panic
/// and never propagated past the component's ingress point.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("missing required field `timestamp`")]
    MissingTimestamp,
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
    #[error("field `{0}` = {1} is outside its documented range")]
    OutOfRange(&'static str, f64),
}

/// §4.2: "rejected when a consumer." Producers clamp before publishing
/// (`common::clamp_unit`/`clamp_nonneg`); a consumer instead refuses a
/// value that is still out of range by the time it reaches decode.
fn validate_unit(field: &'static str, v: f64) -> Result<(), CodecError> {
    if (0.0..=1.0).contains(&v) { Ok(()) } else { Err(CodecError::OutOfRange(field, v)) }
}

fn validate_nonneg(field: &'static str, v: f64) -> Result<(), CodecError> {
    if v >= 0.0 { Ok(()) } else { Err(CodecError::OutOfRange(field, v)) }
}

fn parse_object(payload: &[u8]) -> Result<Value, CodecError> {
    let value: Value = serde_json::from_slice(payload)?;
    if !value.is_object() {
        return Err(CodecError::NotAnObject);
    }
    if value.get("timestamp").is_none() {
        return Err(CodecError::MissingTimestamp);
    }
    Ok(value)
}

fn decode_typed<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, CodecError> {
    Ok(serde_json::from_value(value)?)
}

/// Decode a payload received on the upstream channel for `topic`.
pub fn decode_upstream(topic: &str, payload: &[u8]) -> Result<UpstreamMessage, CodecError> {
    let value = parse_object(payload)?;
    match topic {
        utopic::WW_DETECTED => {
            let msg = decode_typed::<WwDetected>(value)?;
            validate_unit("confidence", msg.confidence)?;
            Ok(UpstreamMessage::WwDetected(msg))
        }
        utopic::STT_TRANSCRIPTION => {
            let msg = decode_typed::<SttTranscription>(value)?;
            validate_unit("confidence", msg.confidence)?;
            Ok(UpstreamMessage::SttTranscription(msg))
        }
        utopic::LLM_RESPONSE => Ok(UpstreamMessage::LlmResponse(decode_typed::<LlmResponse>(
            value,
        )?)),
        utopic::TTS_SPEAK => Ok(UpstreamMessage::TtsCompletion(decode_typed::<
            TtsCompletion,
        >(value)?)),
        utopic::VISN_DETECTION => {
            let msg = decode_typed::<VisnDetection>(value)?;
            validate_unit("confidence", msg.confidence)?;
            Ok(UpstreamMessage::VisnDetection(msg))
        }
        utopic::ESP_SENSOR => {
            let msg = decode_typed::<EspSensor>(value)?;
            validate_nonneg("s1", msg.s1)?;
            validate_nonneg("s2", msg.s2)?;
            validate_nonneg("s3", msg.s3)?;
            validate_nonneg("min_distance", msg.min_distance)?;
            Ok(UpstreamMessage::EspSensor(msg))
        }
        utopic::ESP_ALERT => {
            let msg = decode_typed::<EspAlert>(value)?;
            validate_nonneg("s1", msg.s1)?;
            validate_nonneg("s2", msg.s2)?;
            validate_nonneg("s3", msg.s3)?;
            Ok(UpstreamMessage::EspAlert(msg))
        }
        utopic::NAV_BLOCKED => Ok(UpstreamMessage::NavBlocked(decode_typed::<NavBlocked>(
            value,
        )?)),
        utopic::REMOTE_INTENT => Ok(UpstreamMessage::RemoteIntent(decode_typed::<RemoteIntent>(
            value,
        )?)),
        utopic::REMOTE_HEARTBEAT => Ok(UpstreamMessage::RemoteHeartbeat(decode_typed::<
            RemoteHeartbeat,
        >(value)?)),
        t if t.starts_with(utopic::HEALTH_PREFIX) => {
            let service = t[utopic::HEALTH_PREFIX.len()..].to_owned();
            Ok(UpstreamMessage::Health {
                service,
                event: decode_typed::<HealthEvent>(value)?,
            })
        }
        other => Err(CodecError::UnknownTopic(other.to_owned())),
    }
}

/// Decode a payload received on the downstream channel for `topic`.
pub fn decode_downstream(topic: &str, payload: &[u8]) -> Result<DownstreamMessage, CodecError> {
    let value = parse_object(payload)?;
    match topic {
        dtopic::CMD_LISTEN_START => Ok(DownstreamMessage::CmdListenStart(decode_typed::<
            CmdListenStart,
        >(value)?)),
        dtopic::CMD_LISTEN_STOP => Ok(DownstreamMessage::CmdListenStop(decode_typed::<
            CmdListenStop,
        >(value)?)),
        dtopic::CMD_PAUSE_VISION => Ok(DownstreamMessage::CmdPauseVision(decode_typed::<
            CmdPauseVision,
        >(value)?)),
        dtopic::CMD_VISION_MODE => Ok(DownstreamMessage::CmdVisionMode(decode_typed::<
            CmdVisionMode,
        >(value)?)),
        dtopic::LLM_REQUEST => Ok(DownstreamMessage::LlmRequest(decode_typed::<LlmRequest>(
            value,
        )?)),
        dtopic::TTS_SPEAK => Ok(DownstreamMessage::TtsSpeakRequest(decode_typed::<
            TtsSpeakRequest,
        >(value)?)),
        dtopic::NAV_CMD => Ok(DownstreamMessage::NavCmd(decode_typed::<NavCmd>(value)?)),
        dtopic::SESSION_REMOTE => Ok(DownstreamMessage::SessionRemote(decode_typed::<
            SessionRemote,
        >(value)?)),
        dtopic::CMD_CANCEL_ALL => Ok(DownstreamMessage::CmdCancelAll(decode_typed::<
            CmdCancelAll,
        >(value)?)),
        dtopic::PHASE => Ok(DownstreamMessage::Phase(decode_typed::<PhaseEvent>(value)?)),
        other => Err(CodecError::UnknownTopic(other.to_owned())),
    }
}

/// Encode any serializable payload to the wire's JSON byte form.
pub fn encode(msg: &impl serde::Serialize) -> Vec<u8> {
    serde_json::to_vec(msg).expect("message-schema types are always serializable")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_upstream_topic() {
        let payload = br#"{"keyword":"hey robo","confidence":0.9,"timestamp":100}"#;
        let msg = decode_upstream(utopic::WW_DETECTED, payload).unwrap();
        matches!(msg, UpstreamMessage::WwDetected(_));
    }

    #[test]
    fn tolerates_unknown_fields() {
        let payload = br#"{"keyword":"hey robo","confidence":0.9,"timestamp":100,"extra":true}"#;
        assert!(decode_upstream(utopic::WW_DETECTED, payload).is_ok());
    }

    #[test]
    fn rejects_missing_timestamp() {
        let payload = br#"{"keyword":"hey robo","confidence":0.9}"#;
        let err = decode_upstream(utopic::WW_DETECTED, payload).unwrap_err();
        assert!(matches!(err, CodecError::MissingTimestamp));
    }

    #[test]
    fn rejects_non_object_payload() {
        let payload = b"\"just a string\"";
        let err = decode_upstream(utopic::WW_DETECTED, payload).unwrap_err();
        assert!(matches!(err, CodecError::NotAnObject));
    }

    #[test]
    fn rejects_unknown_topic() {
        let payload = br#"{"timestamp":1}"#;
        let err = decode_upstream("bogus.topic", payload).unwrap_err();
        assert!(matches!(err, CodecError::UnknownTopic(_)));
    }

    #[test]
    fn health_topic_extracts_service_name() {
        let payload = br#"{"ok":true,"timestamp":1}"#;
        let msg = decode_upstream("health.motor_gateway", payload).unwrap();
        match msg {
            UpstreamMessage::Health { service, .. } => assert_eq!(service, "motor_gateway"),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let payload = br#"{"keyword":"hey robo","confidence":1.5,"timestamp":100}"#;
        let err = decode_upstream(utopic::WW_DETECTED, payload).unwrap_err();
        assert!(matches!(err, CodecError::OutOfRange("confidence", _)));
    }

    #[test]
    fn rejects_negative_sensor_distance() {
        let payload = br#"{"s1":-1.0,"s2":5.0,"s3":5.0,"mq2":0.0,"lmotor":0,"rmotor":0,"min_distance":-1.0,"obstacle":false,"warning":false,"timestamp":1}"#;
        let err = decode_upstream(utopic::ESP_SENSOR, payload).unwrap_err();
        assert!(matches!(err, CodecError::OutOfRange("s1", _)));
    }

    #[test]
    fn decodes_nav_blocked() {
        let payload = br#"{"reason":"obstacle","timestamp":1}"#;
        let msg = decode_upstream(utopic::NAV_BLOCKED, payload).unwrap();
        matches!(msg, UpstreamMessage::NavBlocked(_));
    }

    #[test]
    fn decodes_downstream_nav_cmd() {
        let payload = br#"{"direction":"forward","timestamp":1}"#;
        let msg = decode_downstream(dtopic::NAV_CMD, payload).unwrap();
        matches!(msg, DownstreamMessage::NavCmd(_));
    }
}
