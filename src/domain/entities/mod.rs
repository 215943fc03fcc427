//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs live next to the
//! entity they produce (`NewPingback`, `NewTag`, `NewCategory`).
//!
//! # Entity Types
//!
//! - [`PingbackRecord`] / [`PingRequest`] / [`PingbackResponse`] - pingback receipt
//! - [`PostRoute`] / [`PostRef`] - pingback target resolution
//! - [`Tag`] - post tags with normalized lookup names
//! - [`Category`] - post categories

pub mod category;
pub mod pingback;
pub mod post;
pub mod tag;

pub use category::{Category, NewCategory, UpdateCategory};
pub use pingback::{NewPingback, PingRequest, PingbackRecord, PingbackResponse};
pub use post::{PostRef, PostRoute};
pub use tag::{NewTag, Tag};
