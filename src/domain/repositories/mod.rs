//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`PingbackRepository`] - Pingback registration and housekeeping
//! - [`PostRepository`] - Published post lookup for pingback targets
//! - [`TagRepository`] - Tag CRUD
//! - [`CategoryRepository`] - Category CRUD
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod category_repository;
pub mod pingback_repository;
pub mod post_repository;
pub mod tag_repository;

pub use category_repository::CategoryRepository;
pub use pingback_repository::PingbackRepository;
pub use post_repository::PostRepository;
pub use tag_repository::TagRepository;

#[cfg(test)]
pub use category_repository::MockCategoryRepository;
#[cfg(test)]
pub use pingback_repository::MockPingbackRepository;
#[cfg(test)]
pub use post_repository::MockPostRepository;
#[cfg(test)]
pub use tag_repository::MockTagRepository;
