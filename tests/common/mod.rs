#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tokio::sync::mpsc;
use uuid::Uuid;

use blog_engine::application::services::auth_service::hash_token;
use blog_engine::application::services::{
    AuthService, CategoryService, PingbackService, TagService,
};
use blog_engine::domain::entities::{
    Category, NewCategory, NewPingback, NewTag, PingRequest, PingbackRecord, PostRef, PostRoute,
    Tag, UpdateCategory,
};
use blog_engine::domain::notification_event::NotificationEvent;
use blog_engine::domain::repositories::{
    CategoryRepository, PingbackRepository, PostRepository, TagRepository,
};
use blog_engine::domain::source_inspector::{SourceInspectError, SourceInspector};
use blog_engine::error::AppError;
use blog_engine::infrastructure::cache::{DivisionCache, MemoryCache};
use blog_engine::settings::{BlogSettings, SettingsPatch};
use blog_engine::state::AppState;
use blog_engine::utils::tag_normalizer::default_rules;

pub const ADMIN_TOKEN: &str = "test-admin-token";
pub const SITE_HOST: &str = "blog.example";
pub const POST_URL: &str = "https://blog.example/post/2024/3/5/hello-world";

/// Builds an XML-RPC `pingback.ping` body.
pub fn ping_body(source: &str, target: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\
         <methodCall><methodName>pingback.ping</methodName><params>\
         <param><value><string>{source}</string></value></param>\
         <param><value><string>{target}</string></value></param>\
         </params></methodCall>"
    )
}

#[derive(Default)]
pub struct FakePingbackRepository {
    pub records: Mutex<Vec<PingbackRecord>>,
}

impl FakePingbackRepository {
    pub fn seed(&self, count: usize) {
        let mut records = self.records.lock().unwrap();
        for i in 0..count {
            records.push(PingbackRecord {
                id: Uuid::new_v4(),
                domain: "source.example".to_string(),
                source_url: format!("https://source.example/{i}"),
                source_title: format!("Source {i}"),
                target_post_id: Uuid::new_v4(),
                target_post_title: "Hello world".to_string(),
                ping_time_utc: Utc::now(),
                source_ip: "203.0.113.7".to_string(),
            });
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl PingbackRepository for FakePingbackRepository {
    async fn exists(
        &self,
        target_post_id: Uuid,
        source_url: &str,
        source_ip: &str,
    ) -> Result<bool, AppError> {
        Ok(self.records.lock().unwrap().iter().any(|r| {
            r.target_post_id == target_post_id
                && r.source_url == source_url
                && r.source_ip == source_ip
        }))
    }

    async fn create(&self, new_pingback: NewPingback) -> Result<PingbackRecord, AppError> {
        let record = new_pingback.into_record(Uuid::new_v4(), Utc::now());
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<PingbackRecord>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .skip(((page - 1) * page_size) as usize)
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.records.lock().unwrap().len() as i64)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() != before)
    }

    async fn clear(&self) -> Result<u64, AppError> {
        let mut records = self.records.lock().unwrap();
        let removed = records.len() as u64;
        records.clear();
        Ok(removed)
    }
}

/// Serves a single published post at [`POST_URL`].
pub struct FakePostRepository {
    pub post_id: Uuid,
}

impl Default for FakePostRepository {
    fn default() -> Self {
        Self {
            post_id: Uuid::new_v4(),
        }
    }
}

#[async_trait]
impl PostRepository for FakePostRepository {
    async fn find_published_by_route(&self, route: &PostRoute) -> Result<Option<PostRef>, AppError> {
        let published = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        Ok((route.date == published && route.slug == "hello-world").then(|| PostRef {
            id: self.post_id,
            title: "Hello world".to_string(),
        }))
    }
}

/// How a stubbed source URL answers.
#[derive(Clone)]
pub enum StubSource {
    Page { title: String, links_to_target: bool },
    PlainText,
    Image,
    Unreachable,
}

#[derive(Default)]
pub struct StubSourceInspector {
    sources: Mutex<HashMap<String, StubSource>>,
}

impl StubSourceInspector {
    pub fn with(self, url: &str, source: StubSource) -> Self {
        self.sources.lock().unwrap().insert(url.to_string(), source);
        self
    }
}

#[async_trait]
impl SourceInspector for StubSourceInspector {
    async fn inspect(
        &self,
        source_url: &str,
        target_url: &str,
    ) -> Result<PingRequest, SourceInspectError> {
        let source = self.sources.lock().unwrap().get(source_url).cloned();
        let request = |title: &str, has_link: bool, html: bool| PingRequest {
            source_url: source_url.to_string(),
            target_url: target_url.to_string(),
            source_document_title: title.to_string(),
            source_has_link: has_link,
            contains_html: html,
        };

        match source {
            Some(StubSource::Page {
                title,
                links_to_target,
            }) => Ok(request(&title, links_to_target, true)),
            Some(StubSource::PlainText) => Ok(request("", false, false)),
            Some(StubSource::Image) => Err(SourceInspectError::NotHtml("image/png".to_string())),
            Some(StubSource::Unreachable) | None => {
                Err(SourceInspectError::Unreachable("connection refused".to_string()))
            }
        }
    }
}

#[derive(Default)]
pub struct FakeTagRepository {
    tags: Mutex<Vec<Tag>>,
}

#[async_trait]
impl TagRepository for FakeTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, AppError> {
        let mut tags = self.tags.lock().unwrap().clone();
        tags.sort_by(|a, b| a.normalized_name.cmp(&b.normalized_name));
        Ok(tags)
    }

    async fn find_by_normalized_names(
        &self,
        normalized_names: &[String],
    ) -> Result<Vec<Tag>, AppError> {
        Ok(self
            .tags
            .lock()
            .unwrap()
            .iter()
            .filter(|t| normalized_names.contains(&t.normalized_name))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, AppError> {
        Ok(self.tags.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, new_tag: NewTag) -> Result<Tag, AppError> {
        let mut tags = self.tags.lock().unwrap();
        if tags.iter().any(|t| t.normalized_name == new_tag.normalized_name) {
            return Err(AppError::conflict("Tag exists", json!({})));
        }
        let tag = Tag {
            id: Uuid::new_v4(),
            display_name: new_tag.display_name,
            normalized_name: new_tag.normalized_name,
        };
        tags.push(tag.clone());
        Ok(tag)
    }

    async fn update(&self, id: Uuid, new_tag: NewTag) -> Result<Tag, AppError> {
        let mut tags = self.tags.lock().unwrap();
        if tags
            .iter()
            .any(|t| t.id != id && t.normalized_name == new_tag.normalized_name)
        {
            return Err(AppError::conflict("Tag exists", json!({})));
        }
        let tag = tags
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::not_found("Tag not found", json!({})))?;
        tag.display_name = new_tag.display_name;
        tag.normalized_name = new_tag.normalized_name;
        Ok(tag.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tags = self.tags.lock().unwrap();
        let before = tags.len();
        tags.retain(|t| t.id != id);
        Ok(tags.len() != before)
    }
}

#[derive(Default)]
pub struct FakeCategoryRepository {
    categories: Mutex<Vec<Category>>,
}

#[async_trait]
impl CategoryRepository for FakeCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn find_by_route_name(&self, route_name: &str) -> Result<Option<Category>, AppError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.route_name == route_name)
            .cloned())
    }

    async fn create(&self, new_category: NewCategory) -> Result<Category, AppError> {
        let mut categories = self.categories.lock().unwrap();
        if categories
            .iter()
            .any(|c| c.route_name == new_category.route_name)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "categories_route_name_key" }),
            ));
        }
        let category = Category {
            id: Uuid::new_v4(),
            route_name: new_category.route_name,
            display_name: new_category.display_name,
            note: new_category.note,
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, id: Uuid, update: UpdateCategory) -> Result<Category, AppError> {
        let mut categories = self.categories.lock().unwrap();
        let category = categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::not_found("Category not found", json!({})))?;
        category.route_name = update.route_name;
        category.display_name = update.display_name;
        category.note = update.note;
        Ok(category.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        Ok(categories.len() != before)
    }
}

/// Repositories behind a test [`AppState`], kept for assertions.
pub struct TestContext {
    pub state: AppState,
    pub pingbacks: Arc<FakePingbackRepository>,
    pub posts: Arc<FakePostRepository>,
    pub notifications: mpsc::Receiver<NotificationEvent>,
}

pub fn test_settings() -> BlogSettings {
    let secret = "test-signing-secret";
    let mut settings = BlogSettings::default();
    settings.apply(SettingsPatch {
        admin_token_hash: Some(hash_token(secret, ADMIN_TOKEN)),
        token_signing_secret: Some(secret.to_string()),
        tag_normalization: None,
    });
    settings
}

pub fn create_test_state(inspector: StubSourceInspector) -> TestContext {
    let (tx, rx) = mpsc::channel(100);
    let pingbacks = Arc::new(FakePingbackRepository::default());
    let posts = Arc::new(FakePostRepository::default());
    let cache = Arc::new(DivisionCache::new(Arc::new(MemoryCache::new(None))));

    let pingback_service = Arc::new(PingbackService::new(
        pingbacks.clone(),
        posts.clone(),
        Arc::new(inspector),
        tx.clone(),
        Some(SITE_HOST.to_string()),
    ));
    let tag_service = Arc::new(TagService::new(
        Arc::new(FakeTagRepository::default()),
        cache.clone(),
        default_rules(),
    ));
    let category_service = Arc::new(CategoryService::new(
        Arc::new(FakeCategoryRepository::default()),
        cache.clone(),
    ));

    let state = AppState {
        pingback_service,
        tag_service,
        category_service,
        auth_service: Arc::new(AuthService::new(&test_settings())),
        cache,
        notification_sender: tx,
        behind_proxy: true,
    };

    TestContext {
        state,
        pingbacks,
        posts,
        notifications: rx,
    }
}
