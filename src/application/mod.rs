//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and caching, and give HTTP
//! handlers and the admin CLI a narrow API.
//!
//! # Available Services
//!
//! - [`services::pingback_service::PingbackService`] - Pingback validation and housekeeping
//! - [`services::tag_service::TagService`] - Tag creation with name normalization
//! - [`services::category_service::CategoryService`] - Category management
//! - [`services::auth_service::AuthService`] - Admin bearer token authentication

pub mod services;
