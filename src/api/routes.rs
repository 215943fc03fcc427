//! Admin API route configuration.
//!
//! All admin endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::api::handlers::{
    clear_pingbacks_handler, create_category_handler, create_tags_handler,
    delete_category_handler, delete_pingback_handler, delete_tag_handler, get_category_handler,
    list_categories_handler, list_pingbacks_handler, list_tags_handler, update_category_handler,
    update_tag_handler,
};
use crate::state::AppState;

/// Admin routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /pingbacks`          - List registered pingbacks (paginated)
/// - `DELETE /pingbacks`          - Delete all pingbacks
/// - `DELETE /pingbacks/{id}`     - Delete one pingback
/// - `GET    /tags`               - List tags
/// - `POST   /tags`               - Resolve or create tags from display names
/// - `PUT    /tags/{id}`          - Rename a tag
/// - `DELETE /tags/{id}`          - Delete a tag
/// - `GET    /categories`         - List categories
/// - `POST   /categories`         - Create a category
/// - `GET    /categories/{name}`  - Find a category by route name
/// - `PUT    /categories/{id}`    - Update a category
/// - `DELETE /categories/{id}`    - Delete a category
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/pingbacks",
            get(list_pingbacks_handler).delete(clear_pingbacks_handler),
        )
        .route("/pingbacks/{id}", delete(delete_pingback_handler))
        .route("/tags", get(list_tags_handler).post(create_tags_handler))
        .route(
            "/tags/{id}",
            put(update_tag_handler).delete(delete_tag_handler),
        )
        .route(
            "/categories",
            get(list_categories_handler).post(create_category_handler),
        )
        .route(
            "/categories/{id}",
            get(get_category_handler)
                .put(update_category_handler)
                .delete(delete_category_handler),
        )
}
