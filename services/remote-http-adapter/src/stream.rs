use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures::stream;

use crate::routes::ErrorBody;
use crate::state::AppState;

const BOUNDARY: &str = "frame";
/// Synthetic frame cadence. Real camera capture is out of scope (§1); this
/// keeps the single-consumer arbitration mechanic (P8) fully exercisable
/// without any capture hardware.
const FRAME_INTERVAL: Duration = Duration::from_millis(200);

/// Releases the single-consumer stream slot when the response body is
/// dropped — covers both a clean end-of-stream and an early client
/// disconnect, without a separate cleanup task.
struct StreamGuard {
    held: Arc<AtomicBool>,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::SeqCst);
    }
}

/// `GET /stream/mjpeg` — at most one HTTP client may hold this stream at a
/// time (§6/§8 P8); a second concurrent request gets HTTP 409.
pub async fn get_mjpeg_stream(State(state): State<AppState>) -> Response {
    if state.stream_held.swap(true, Ordering::SeqCst) {
        let body = ErrorBody {
            code: "stream_busy".to_owned(),
            message: "the MJPEG stream already has a consumer".to_owned(),
        };
        return (StatusCode::CONFLICT, axum::Json(body)).into_response();
    }

    let guard = StreamGuard { held: state.stream_held.clone() };
    let ticker = tokio::time::interval(FRAME_INTERVAL);

    let frames = stream::unfold((ticker, guard), |(mut ticker, guard)| async move {
        ticker.tick().await;
        let frame = placeholder_jpeg_frame();
        let mut part = Vec::with_capacity(frame.len() + 64);
        part.extend_from_slice(format!("--{BOUNDARY}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n", frame.len()).as_bytes());
        part.extend_from_slice(&frame);
        part.extend_from_slice(b"\r\n");
        Some((Ok::<Bytes, std::io::Error>(Bytes::from(part)), (ticker, guard)))
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format!("multipart/x-mixed-replace; boundary={BOUNDARY}"))
        .body(Body::from_stream(frames))
        .expect("static headers are always valid")
}

/// No camera capture is wired up (§1 Non-goals); this emits a minimal valid
/// JPEG byte sequence so the multipart framing itself is fully testable.
fn placeholder_jpeg_frame() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xD9]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_releases_flag_on_drop() {
        let held = Arc::new(AtomicBool::new(true));
        {
            let _guard = StreamGuard { held: held.clone() };
            assert!(held.load(Ordering::SeqCst));
        }
        assert!(!held.load(Ordering::SeqCst));
    }
}
