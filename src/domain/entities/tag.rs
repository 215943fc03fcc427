//! Tag entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A post tag.
///
/// `normalized_name` is derived from `display_name` through the tag
/// normalization table and is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub display_name: String,
    pub normalized_name: String,
}

/// Input data for creating a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub display_name: String,
    pub normalized_name: String,
}
