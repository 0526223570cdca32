//! Handler-level integration tests: build a real `AppState` (a live, bound
//! `Publisher` with no peer attached — `publish` is fire-and-forget, so this
//! is enough to exercise the handlers) and call the route functions
//! directly, the same way the teacher's `admin.rs` handlers are tested.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use config_resolver::HttpConfig;
use ipc_fabric::Publisher;
use remote_http_adapter::routes::{self, IntentBody};
use remote_http_adapter::state::{AppState, CameraSettings};

async fn test_state() -> AppState {
    let publisher = Publisher::bind("tcp://127.0.0.1:0")
        .await
        .expect("binding an ephemeral loopback publisher never fails under test");
    let http_cfg = HttpConfig {
        bind: "127.0.0.1".to_owned(),
        port: 0,
        allow_cidrs: vec!["127.0.0.1/32".parse().unwrap()],
        log_dir: "/tmp".to_owned(),
    };
    AppState::new(publisher, http_cfg, 10)
}

#[tokio::test]
async fn post_intent_rejects_an_empty_intent() {
    let state = test_state().await;
    let body = IntentBody {
        intent: "  ".to_owned(),
        direction: None,
        text: None,
        speed: None,
        duration_ms: None,
        extras: None,
    };
    let response = routes::post_intent(State(state), Json(body)).await.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_intent_accepts_a_well_formed_intent() {
    let state = test_state().await;
    let body = IntentBody {
        intent: "start_listen".to_owned(),
        direction: None,
        text: None,
        speed: None,
        duration_ms: None,
        extras: None,
    };
    let response = routes::post_intent(State(state), Json(body)).await.into_response();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn camera_settings_round_trip_updates_the_cache() {
    let state = test_state().await;

    let initial = routes::get_camera_settings(State(state.clone())).await;
    assert_eq!(initial.0, CameraSettings::default());

    let update = CameraSettings { resolution_w: 640, resolution_h: 480, fps: 30 };
    let response = routes::post_camera_settings(State(state.clone()), Json(update.clone()))
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let after = routes::get_camera_settings(State(state)).await;
    assert_eq!(after.0.resolution_w, 640);
    assert_eq!(after.0.fps, 30);
}

#[tokio::test]
async fn camera_settings_rejects_out_of_range_fps() {
    let state = test_state().await;
    let bad = CameraSettings { resolution_w: 640, resolution_h: 480, fps: 0 };
    let response = routes::post_camera_settings(State(state), Json(bad)).await.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
