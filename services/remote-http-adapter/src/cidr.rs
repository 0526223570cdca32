use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ipnet::IpNet;
use message_schema::codec;
use message_schema::topics::upstream as utopic;
use message_schema::upstream::RemoteHeartbeat;
use robot_core::ids;

use crate::routes::ErrorBody;
use crate::state::AppState;

/// True if `addr` falls inside any of `allow_cidrs` (§4.8: "Gate every
/// request against the configured CIDR allow-list; reject with HTTP 403
/// otherwise.").  An empty allow-list denies everything rather than
/// defaulting open.
pub fn is_allowed(addr: IpAddr, allow_cidrs: &[IpNet]) -> bool {
    allow_cidrs.iter().any(|net| net.contains(&addr))
}

/// Rejects disallowed peers with 403 and, on success, refreshes the remote
/// session heartbeat — "every accepted request refreshes the remote session
/// heartbeat" (§4.8) is implemented once here rather than in every handler.
pub async fn gate(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    if !is_allowed(peer.ip(), &state.http_cfg.allow_cidrs) {
        let body = ErrorBody {
            code: "forbidden".to_owned(),
            message: format!("{} is not in the remote allow-list", peer.ip()),
        };
        return (StatusCode::FORBIDDEN, Json(body)).into_response();
    }

    let heartbeat = RemoteHeartbeat { timestamp: ids::now_ts() };
    let payload = codec::encode(&heartbeat);
    state.publish_upstream(utopic::REMOTE_HEARTBEAT, &payload).await;

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_address_inside_configured_cidr() {
        let nets = vec!["192.168.1.0/24".parse().unwrap()];
        assert!(is_allowed("192.168.1.42".parse().unwrap(), &nets));
    }

    #[test]
    fn rejects_address_outside_configured_cidr() {
        let nets = vec!["192.168.1.0/24".parse().unwrap()];
        assert!(!is_allowed("10.0.0.5".parse().unwrap(), &nets));
    }

    #[test]
    fn empty_allow_list_denies_everything() {
        assert!(!is_allowed("127.0.0.1".parse().unwrap(), &[]));
    }
}
