//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Database**: counts pingbacks
/// 2. **Cache**: backend health probe plus tracked division count
/// 3. **Notification Queue**: channel open, free capacity
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let cache = check_cache(&state).await;
    let notification_queue = check_notification_queue(&state);

    let all_healthy = database.is_ok() && cache.is_ok() && notification_queue.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            cache,
            notification_queue,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.pingback_service.count_pingbacks().await {
        Ok(count) => CheckStatus::ok(format!("Connected, {count} pingbacks stored")),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    let store = state.cache.store();
    if store.health_check().await {
        CheckStatus::ok(format!(
            "{} store, {} divisions tracked",
            store.backend(),
            state.cache.division_count()
        ))
    } else {
        CheckStatus::error(format!("{} store unreachable", store.backend()))
    }
}

fn check_notification_queue(state: &AppState) -> CheckStatus {
    if state.notification_sender.is_closed() {
        CheckStatus::error("Notification queue is closed")
    } else {
        CheckStatus::ok(format!(
            "Free capacity: {}",
            state.notification_sender.capacity()
        ))
    }
}
