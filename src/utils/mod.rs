//! Utility functions shared across layers.
//!
//! - [`tag_normalizer`] - Tag/category name normalization and validation
//! - [`xmlrpc`] - XML-RPC codec for `pingback.ping`
//! - [`url_normalizer`] - URL normalization and comparison
//! - [`post_route`] - Public post URL parsing
//! - [`client_ip`] - Client IP extraction from request metadata
//! - [`db_error`] - PostgreSQL error classification

pub mod client_ip;
pub mod db_error;
pub mod post_route;
pub mod tag_normalizer;
pub mod url_normalizer;
pub mod xmlrpc;
