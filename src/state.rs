//! Shared state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{AuthService, CategoryService, PingbackService, TagService};
use crate::domain::notification_event::NotificationEvent;
use crate::infrastructure::cache::DivisionCache;

/// Application state cloned into each request.
///
/// Every field is cheap to clone (`Arc` or channel handle).
#[derive(Clone)]
pub struct AppState {
    pub pingback_service: Arc<PingbackService>,
    pub tag_service: Arc<TagService>,
    pub category_service: Arc<CategoryService>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<DivisionCache>,
    /// Kept for health reporting; services hold their own clone.
    pub notification_sender: mpsc::Sender<NotificationEvent>,
    /// Read client IPs from forwarding headers.
    pub behind_proxy: bool,
}
