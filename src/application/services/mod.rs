//! Business logic services for the application layer.

pub mod auth_service;
pub mod category_service;
pub mod pingback_service;
pub mod tag_service;

pub use auth_service::AuthService;
pub use category_service::CategoryService;
pub use pingback_service::PingbackService;
pub use tag_service::TagService;

/// Cache division holding site-wide lists (tags, categories).
pub const GENERAL_DIVISION: &str = "general";
