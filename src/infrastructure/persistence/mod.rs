//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` row structs.
//!
//! # Repositories
//!
//! - [`PgPingbackRepository`] - Pingback registration and housekeeping
//! - [`PgPostRepository`] - Published post lookup
//! - [`PgTagRepository`] - Tag storage
//! - [`PgCategoryRepository`] - Category storage

pub mod pg_category_repository;
pub mod pg_pingback_repository;
pub mod pg_post_repository;
pub mod pg_tag_repository;

pub use pg_category_repository::PgCategoryRepository;
pub use pg_pingback_repository::PgPingbackRepository;
pub use pg_post_repository::PgPostRepository;
pub use pg_tag_repository::PgTagRepository;
