//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /pingback`    - XML-RPC pingback endpoint (public)
//! - `GET  /health`      - Health check: DB, cache, notification queue (public)
//! - `/api/*`            - Admin REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token on `/api`
//! - **Path normalization** - Trailing slash handling

use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::handlers::{health_handler, pingback_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
///
/// Rate limiting reads the client IP from forwarding headers when
/// `state.behind_proxy` is set.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let behind_proxy = state.behind_proxy;

    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer(behind_proxy));

    let pingback_router = Router::new()
        .route("/pingback", post(pingback_handler))
        .layer(rate_limit::layer(behind_proxy));

    let router = Router::new()
        .merge(pingback_router)
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
