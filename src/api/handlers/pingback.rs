//! XML-RPC pingback endpoint.

use std::net::SocketAddr;

use axum::{
    Extension,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::domain::entities::PingbackResponse;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;
use crate::utils::xmlrpc::{fault_response, success_response};

const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Receives a `pingback.ping` call.
///
/// # Endpoint
///
/// `POST /pingback`
///
/// # Response Codes
///
/// - **200 OK**: XML-RPC success, or fault 17 / 32 / 48
/// - **400 Bad Request**: not a well-formed `pingback.ping` call
/// - **404 Not Found**: source rejected as spam (empty body)
/// - **500 Internal Server Error**: source unreachable or storage failure
pub async fn pingback_handler(
    State(state): State<AppState>,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let peer = connect_info.map(|Extension(ConnectInfo(addr))| addr);
    let source_ip = client_ip(&headers, peer, state.behind_proxy)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    debug!(source_ip, user_agent, bytes = body.len(), "Pingback request");

    let outcome = state
        .pingback_service
        .receive_ping(&body, &source_ip)
        .await;

    pingback_http_response(outcome)
}

/// Maps a pingback outcome to its HTTP response.
pub fn pingback_http_response(outcome: PingbackResponse) -> Response {
    let xml = |status: StatusCode, body: String| {
        (status, [(header::CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response()
    };

    match outcome {
        PingbackResponse::Success => xml(
            StatusCode::OK,
            success_response("Thanks! Pingback received."),
        ),
        PingbackResponse::Error17SourceNotContainTargetUri => xml(
            StatusCode::OK,
            fault_response(17, "The source URI does not contain a link to the target URI."),
        ),
        PingbackResponse::Error32TargetUriNotExist => xml(
            StatusCode::OK,
            fault_response(32, "The specified target URI does not exist."),
        ),
        PingbackResponse::Error48PingbackAlreadyRegistered => xml(
            StatusCode::OK,
            fault_response(48, "The pingback has already been registered."),
        ),
        PingbackResponse::InvalidPingRequest => StatusCode::BAD_REQUEST.into_response(),
        PingbackResponse::SpamDetectedFakeNotFound => StatusCode::NOT_FOUND.into_response(),
        PingbackResponse::GenericError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
