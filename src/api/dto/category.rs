//! DTOs for category endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{Category, NewCategory, UpdateCategory};

/// Request body for `POST /api/categories` and `PUT /api/categories/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(length(min = 1, max = 64))]
    pub route_name: String,

    #[validate(length(min = 1, max = 64))]
    pub display_name: String,

    #[validate(length(max = 128))]
    pub note: Option<String>,
}

impl From<CategoryRequest> for NewCategory {
    fn from(r: CategoryRequest) -> Self {
        Self {
            route_name: r.route_name,
            display_name: r.display_name,
            note: r.note,
        }
    }
}

impl From<CategoryRequest> for UpdateCategory {
    fn from(r: CategoryRequest) -> Self {
        Self {
            route_name: r.route_name,
            display_name: r.display_name,
            note: r.note,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub route_name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            route_name: c.route_name,
            display_name: c.display_name,
            note: c.note,
        }
    }
}
