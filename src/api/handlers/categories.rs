//! Admin endpoints for categories.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::category::{CategoryRequest, CategoryResponse};
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/categories`
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, AppError> {
    let categories = state.category_service.list_categories().await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// Looks a category up by its public route name.
///
/// # Endpoint
///
/// `GET /api/categories/{route_name}`
pub async fn get_category_handler(
    State(state): State<AppState>,
    Path(route_name): Path<String>,
) -> Result<Json<CategoryResponse>, AppError> {
    let category = state.category_service.get_by_route_name(&route_name).await?;
    Ok(Json(category.into()))
}

/// Creates a category.
///
/// # Endpoint
///
/// `POST /api/categories`
///
/// # Errors
///
/// - 400 for an invalid route or display name
/// - 409 if the route name is already used
pub async fn create_category_handler(
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), AppError> {
    payload.validate()?;

    let category = state
        .category_service
        .create_category(payload.into())
        .await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

/// `PUT /api/categories/{id}`
pub async fn update_category_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<CategoryResponse>, AppError> {
    payload.validate()?;

    let category = state
        .category_service
        .update_category(id, payload.into())
        .await?;
    Ok(Json(category.into()))
}

/// `DELETE /api/categories/{id}`
pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.category_service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
