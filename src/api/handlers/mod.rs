//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod categories;
pub mod health;
pub mod pingback;
pub mod pingbacks;
pub mod tags;

pub use categories::{
    create_category_handler, delete_category_handler, get_category_handler,
    list_categories_handler, update_category_handler,
};
pub use health::health_handler;
pub use pingback::pingback_handler;
pub use pingbacks::{clear_pingbacks_handler, delete_pingback_handler, list_pingbacks_handler};
pub use tags::{create_tags_handler, delete_tag_handler, list_tags_handler, update_tag_handler};
