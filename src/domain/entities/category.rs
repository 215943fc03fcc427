//! Category entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A post category, addressed publicly by its `route_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub route_name: String,
    pub display_name: String,
    pub note: Option<String>,
}

/// Input data for creating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub route_name: String,
    pub display_name: String,
    pub note: Option<String>,
}

/// Full replacement of a category's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCategory {
    pub route_name: String,
    pub display_name: String,
    pub note: Option<String>,
}
