use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use message_schema::codec;
use message_schema::topics::upstream as utopic;
use message_schema::upstream::RemoteIntent;
use robot_core::ids;
use serde::{Deserialize, Serialize};

use crate::state::{AppState, CameraSettings};
use crate::telemetry::TelemetrySnapshot;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { code: code.to_owned(), message: message.into() })).into_response()
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub ok: bool,
    pub timestamp: i64,
}

/// `GET /health` — "does not require the CIDR gate to have passed for this
/// specific probe" is explicitly NOT how §4.8 reads (every route is gated),
/// so this still runs behind the same middleware as everything else.
pub async fn get_health() -> Json<HealthBody> {
    Json(HealthBody { ok: true, timestamp: ids::now_ts() })
}

/// `GET /status` and `GET /telemetry` — same shape, historical alias (§6).
pub async fn get_telemetry(State(state): State<AppState>) -> Json<TelemetrySnapshot> {
    Json(state.telemetry.read().clone())
}

#[derive(Debug, Deserialize)]
pub struct IntentBody {
    pub intent: String,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub extras: Option<serde_json::Value>,
}

/// `POST /intent` — translate the body into a `remote.intent` event and
/// return immediately; never awaits any orchestrator effect (§4.8).
pub async fn post_intent(State(state): State<AppState>, Json(body): Json<IntentBody>) -> Response {
    if body.intent.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "invalid_intent", "intent must not be empty");
    }

    let wire = RemoteIntent {
        intent: body.intent,
        direction: body.direction,
        text: body.text,
        speed: body.speed,
        duration_ms: body.duration_ms,
        extras: body.extras,
        timestamp: ids::now_ts(),
    };
    let payload = codec::encode(&wire);
    state.publish_upstream(utopic::REMOTE_INTENT, &payload).await;
    StatusCode::ACCEPTED.into_response()
}

/// `GET /settings/camera` — returns the adapter-local desired-settings cache.
pub async fn get_camera_settings(State(state): State<AppState>) -> Json<CameraSettings> {
    Json(state.camera_settings.read().clone())
}

/// `POST /settings/camera` — validates ranges, updates the cache, and
/// republishes the change as a `remote.intent` event (§4.8's ambient
/// supplement: the topic table stays closed, this just reuses `remote.intent`
/// with `intent: "set_camera_settings"`).
pub async fn post_camera_settings(
    State(state): State<AppState>,
    Json(body): Json<CameraSettings>,
) -> Response {
    if body.resolution_w == 0
        || body.resolution_h == 0
        || body.resolution_w > 4096
        || body.resolution_h > 4096
        || body.fps == 0
        || body.fps > 60
    {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_camera_settings",
            "resolution/fps out of accepted range",
        );
    }

    *state.camera_settings.write() = body.clone();

    let extras = serde_json::json!({
        "resolution_w": body.resolution_w,
        "resolution_h": body.resolution_h,
        "fps": body.fps,
    });
    let wire = RemoteIntent {
        intent: "set_camera_settings".to_owned(),
        direction: None,
        text: None,
        speed: None,
        duration_ms: None,
        extras: Some(extras),
        timestamp: ids::now_ts(),
    };
    let payload = codec::encode(&wire);
    state.publish_upstream(utopic::REMOTE_INTENT, &payload).await;

    Json(body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_serializes_code_and_message() {
        let body = ErrorBody { code: "forbidden".to_owned(), message: "nope".to_owned() };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "forbidden");
    }
}
