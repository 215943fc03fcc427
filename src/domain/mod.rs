//! Domain layer containing business entities and ports.
//!
//! This module defines entities, repository interfaces and the ports used by
//! the application services, independent of infrastructure concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`source_inspector`] - Port for fetching pingback source documents
//! - [`notification_event`] - Owner notification model and [`notification_event::Notifier`] port
//! - [`notification_worker`] - Asynchronous notification delivery
//!
//! # Notification Flow
//!
//! 1. [`crate::application::services::PingbackService`] registers a pingback
//! 2. [`notification_event::NotificationEvent`] is pushed to a bounded channel (non-blocking)
//! 3. [`notification_worker::run_notification_worker`] hands it to the configured notifier

pub mod entities;
pub mod notification_event;
pub mod notification_worker;
pub mod repositories;
pub mod source_inspector;
