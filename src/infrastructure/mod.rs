//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for persistence, caching and outbound HTTP.
//!
//! # Modules
//!
//! - [`cache`] - Cache stores and grouped invalidation
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`source`] - Pingback source fetching and scanning
//! - [`notification`] - Owner notification delivery

pub mod cache;
pub mod notification;
pub mod persistence;
pub mod source;
