//! Bearer token guard for the admin API.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Rejects `/api` requests that do not carry the admin token.
///
/// The raw token from `Authorization: Bearer <token>` is checked by
/// [`AuthService::authenticate`](crate::application::services::AuthService::authenticate)
/// against the HMAC stored in the settings file. Failures are `401` with
/// `WWW-Authenticate: Bearer`.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => token,
        Err(_) => {
            tracing::debug!(path = %parts.uri.path(), "Admin request without bearer token");
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            ));
        }
    };

    if let Err(e) = st.auth_service.authenticate(&token) {
        tracing::warn!(path = %parts.uri.path(), "Admin request with rejected token");
        return Err(e);
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
