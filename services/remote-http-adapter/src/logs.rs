use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use robot_core::ids;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::routes::ErrorBody;
use crate::state::AppState;

const MAX_LINES: usize = 1000;
const DEFAULT_LINES: usize = 100;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub service: String,
    #[serde(default)]
    pub lines: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LogsBody {
    pub service: String,
    pub lines: Vec<String>,
    pub sources: Vec<String>,
    pub ts: i64,
}

/// `GET /logs?service=<name>&lines=<N>` — reads a bounded tail straight off
/// the filesystem, not via IPC (§4.8): the log files are written by each
/// service's own `tracing_subscriber` file appender under `http.log_dir`.
pub async fn get_logs(State(state): State<AppState>, Query(query): Query<LogsQuery>) -> Response {
    if query.service.contains('/') || query.service.contains("..") {
        return error(StatusCode::BAD_REQUEST, "invalid_service", "service name is not a valid path segment");
    }
    let requested = query.lines.unwrap_or(DEFAULT_LINES).min(MAX_LINES);
    let path = std::path::Path::new(&state.http_cfg.log_dir).join(format!("{}.log", query.service));

    let file = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(e) => {
            return error(StatusCode::NOT_FOUND, "log_not_found", format!("{}: {e}", path.display()));
        }
    };

    let mut all_lines = Vec::new();
    let mut reader = BufReader::new(file).lines();
    while let Ok(Some(line)) = reader.next_line().await {
        all_lines.push(line);
        if all_lines.len() > MAX_LINES * 4 {
            all_lines.drain(0..all_lines.len() - MAX_LINES);
        }
    }
    let tail_start = all_lines.len().saturating_sub(requested);

    Json(LogsBody {
        service: query.service,
        lines: all_lines.split_off(tail_start),
        sources: vec![path.display().to_string()],
        ts: ids::now_ts(),
    })
    .into_response()
}

fn error(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { code: code.to_owned(), message: message.into() })).into_response()
}
