//! Admin JSON API and the public pingback endpoint.
//!
//! Handlers stay thin: they validate DTOs, call a service from
//! [`AppState`](crate::state::AppState) and shape the reply.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
