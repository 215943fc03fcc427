//! DTOs for tag endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::Tag;

/// Request body for `POST /api/tags`.
///
/// Invalid names are skipped rather than rejected; the response lists only
/// the tags that were resolved.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagsRequest {
    #[validate(length(min = 1, max = 100, message = "Provide between 1 and 100 names"))]
    pub names: Vec<String>,
}

/// Request body for `PUT /api/tags/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTagRequest {
    #[validate(length(min = 1, max = 64))]
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub display_name: String,
    pub normalized_name: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            display_name: tag.display_name,
            normalized_name: tag.normalized_name,
        }
    }
}
