//! Admin endpoints for tags.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::tag::{CreateTagsRequest, TagResponse, UpdateTagRequest};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/tags`
pub async fn list_tags_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    let tags = state.tag_service.list_tags().await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

/// Resolves display names to tags, creating missing ones.
///
/// # Endpoint
///
/// `POST /api/tags`
///
/// # Request Body
///
/// ```json
/// { "names": ["C#", ".NET Core", "Rust"] }
/// ```
///
/// Names that fail validation are skipped silently.
pub async fn create_tags_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateTagsRequest>,
) -> Result<(StatusCode, Json<Vec<TagResponse>>), AppError> {
    payload.validate()?;

    let tags = state.tag_service.create_tags(&payload.names).await?;
    Ok((
        StatusCode::CREATED,
        Json(tags.into_iter().map(TagResponse::from).collect()),
    ))
}

/// `PUT /api/tags/{id}`
pub async fn update_tag_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTagRequest>,
) -> Result<Json<TagResponse>, AppError> {
    payload.validate()?;

    let tag = state
        .tag_service
        .update_tag(id, &payload.display_name)
        .await?;
    Ok(Json(tag.into()))
}

/// `DELETE /api/tags/{id}`
pub async fn delete_tag_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.tag_service.delete_tag(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
