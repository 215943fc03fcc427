//! Tag management on top of the name normalizer.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use super::GENERAL_DIVISION;
use crate::domain::entities::{NewTag, Tag};
use crate::domain::repositories::TagRepository;
use crate::error::AppError;
use crate::infrastructure::cache::DivisionCache;
use crate::utils::tag_normalizer::{TagNormalizationRule, normalize_name, validate_name};

const TAGS_CACHE_KEY: &str = "tags";

/// Creates, renames and lists tags.
///
/// Writes invalidate the `general` cache division, which holds the tag list.
pub struct TagService {
    repository: Arc<dyn TagRepository>,
    cache: Arc<DivisionCache>,
    rules: Vec<TagNormalizationRule>,
}

impl TagService {
    pub fn new(
        repository: Arc<dyn TagRepository>,
        cache: Arc<DivisionCache>,
        rules: Vec<TagNormalizationRule>,
    ) -> Self {
        Self {
            repository,
            cache,
            rules,
        }
    }

    /// Normalizes a display name with the configured table.
    pub fn normalize(&self, display_name: &str) -> String {
        normalize_name(display_name.trim(), &self.rules)
    }

    /// Resolves display names to tags, creating the ones that do not exist.
    ///
    /// Invalid names are skipped, not reported. Names that normalize to the
    /// same value collapse into one tag. The result follows input order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_tags(&self, names: &[String]) -> Result<Vec<Tag>, AppError> {
        let mut seen = HashSet::new();
        let mut wanted: Vec<NewTag> = Vec::new();

        for name in names {
            let display_name = name.trim();
            if !validate_name(display_name) {
                debug!(name = %name, "Skipping invalid tag name");
                continue;
            }

            let normalized_name = self.normalize(display_name);
            if seen.insert(normalized_name.clone()) {
                wanted.push(NewTag {
                    display_name: display_name.to_string(),
                    normalized_name,
                });
            }
        }

        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let lookup: Vec<String> = wanted.iter().map(|t| t.normalized_name.clone()).collect();
        let existing = self.repository.find_by_normalized_names(&lookup).await?;

        let mut tags = Vec::with_capacity(wanted.len());
        let mut created = 0usize;

        for new_tag in wanted {
            if let Some(tag) = existing
                .iter()
                .find(|t| t.normalized_name == new_tag.normalized_name)
            {
                tags.push(tag.clone());
                continue;
            }

            let normalized_name = new_tag.normalized_name.clone();
            match self.repository.create(new_tag).await {
                Ok(tag) => {
                    created += 1;
                    tags.push(tag);
                }
                // Created concurrently by another request.
                Err(AppError::Conflict { .. }) => {
                    let mut found = self
                        .repository
                        .find_by_normalized_names(std::slice::from_ref(&normalized_name))
                        .await?;
                    if let Some(tag) = found.pop() {
                        tags.push(tag);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        if created > 0 {
            info!(created, "Tags created");
            self.cache.remove(GENERAL_DIVISION).await;
        }

        Ok(tags)
    }

    /// Lists all tags. Cached in the `general` division.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        self.cache
            .get_or_create(GENERAL_DIVISION, TAGS_CACHE_KEY, || self.repository.list())
            .await
    }

    /// Renames a tag; its normalized name is recomputed.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the new name is invalid
    /// - [`AppError::NotFound`] if the tag does not exist
    /// - [`AppError::Conflict`] if another tag already normalizes to the same name
    pub async fn update_tag(&self, id: Uuid, display_name: &str) -> Result<Tag, AppError> {
        let display_name = display_name.trim();
        if !validate_name(display_name) {
            return Err(AppError::bad_request(
                "Invalid tag name",
                json!({ "name": display_name }),
            ));
        }

        let tag = self
            .repository
            .update(
                id,
                NewTag {
                    display_name: display_name.to_string(),
                    normalized_name: self.normalize(display_name),
                },
            )
            .await?;

        self.cache.remove(GENERAL_DIVISION).await;
        Ok(tag)
    }

    /// Deletes a tag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the tag does not exist.
    pub async fn delete_tag(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("Tag not found", json!({ "id": id })));
        }

        self.cache.remove(GENERAL_DIVISION).await;
        Ok(())
    }
}
