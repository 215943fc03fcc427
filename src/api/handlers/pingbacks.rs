//! Admin endpoints for registered pingbacks.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::{Paginated, PaginationParams};
use crate::api::dto::pingback::{ClearPingbacksResponse, PingbackItem};
use crate::error::AppError;
use crate::state::AppState;

/// Lists pingbacks, newest first.
///
/// # Endpoint
///
/// `GET /api/pingbacks?page=1&page_size=25`
pub async fn list_pingbacks_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Paginated<PingbackItem>>, AppError> {
    params.validate()?;
    let (page, page_size) = params.resolve();

    let total = state.pingback_service.count_pingbacks().await?;
    let items = state
        .pingback_service
        .list_pingbacks(page, page_size)
        .await?
        .into_iter()
        .map(PingbackItem::from)
        .collect();

    Ok(Json(Paginated::new(items, page, page_size, total)))
}

/// `DELETE /api/pingbacks/{id}`
pub async fn delete_pingback_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.pingback_service.delete_pingback(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes every pingback.
///
/// # Endpoint
///
/// `DELETE /api/pingbacks`
pub async fn clear_pingbacks_handler(
    State(state): State<AppState>,
) -> Result<Json<ClearPingbacksResponse>, AppError> {
    let removed = state.pingback_service.clear_pingbacks().await?;
    Ok(Json(ClearPingbacksResponse { removed }))
}
