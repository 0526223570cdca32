pub mod cidr;
pub mod logs;
pub mod routes;
pub mod state;
pub mod stream;
pub mod telemetry;

use axum::routing::get;
use axum::Router;

use state::AppState;

/// Assemble the full route table behind the CIDR gate. Split out of `main`
/// so integration tests can build a `Router` without going through process
/// startup (config loading, fabric connect, socket binds).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::get_health))
        .route("/status", get(routes::get_telemetry))
        .route("/telemetry", get(routes::get_telemetry))
        .route("/intent", axum::routing::post(routes::post_intent))
        .route("/stream/mjpeg", get(stream::get_mjpeg_stream))
        .route("/logs", get(logs::get_logs))
        .route(
            "/settings/camera",
            get(routes::get_camera_settings).post(routes::post_camera_settings),
        )
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), cidr::gate))
        .with_state(state)
}
