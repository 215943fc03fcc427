//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, settings, cache setup, worker spawning, and
//! the Axum server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::mpsc;

use crate::application::services::{AuthService, CategoryService, PingbackService, TagService};
use crate::config::Config;
use crate::domain::notification_event::Notifier;
use crate::domain::notification_worker::run_notification_worker;
use crate::infrastructure::cache::{CacheService, DivisionCache, MemoryCache, NullCache, RedisCache};
use crate::infrastructure::notification::{LogNotifier, WebhookNotifier};
use crate::infrastructure::persistence::{
    PgCategoryRepository, PgPingbackRepository, PgPostRepository, PgTagRepository,
};
use crate::infrastructure::source::HttpSourceInspector;
use crate::routes::app_router;
use crate::settings::BlogSettings;
use crate::state::AppState;

const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Settings file (admin credentials, tag table)
/// - Cache store (Redis, in-memory, or disabled)
/// - Background notification worker
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The settings file cannot be read
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let settings = BlogSettings::load(&config.settings_file)?;
    let auth_service = Arc::new(AuthService::new(&settings));

    let cache = Arc::new(DivisionCache::new(build_cache_store(&config).await));

    let (notification_tx, notification_rx) = mpsc::channel(config.notification_queue_capacity);
    let notifier = build_notifier(&config)?;
    let worker = tokio::spawn(run_notification_worker(notification_rx, notifier));

    let pool = Arc::new(pool);
    let inspector = HttpSourceInspector::new(
        Duration::from_secs(config.source_fetch_timeout_seconds),
        config.source_max_bytes,
    )
    .context("Failed to build HTTP client")?
    .allow_private_addresses(config.source_allow_private);

    let pingback_service = Arc::new(PingbackService::new(
        Arc::new(PgPingbackRepository::new(pool.clone())),
        Arc::new(PgPostRepository::new(pool.clone())),
        Arc::new(inspector),
        notification_tx.clone(),
        config.site_host(),
    ));
    let tag_service = Arc::new(TagService::new(
        Arc::new(PgTagRepository::new(pool.clone())),
        cache.clone(),
        settings.tag_rules(),
    ));
    let category_service = Arc::new(CategoryService::new(
        Arc::new(PgCategoryRepository::new(pool.clone())),
        cache.clone(),
    ));

    let state = AppState {
        pingback_service,
        tag_service,
        category_service,
        auth_service,
        cache,
        notification_sender: notification_tx,
        behind_proxy: config.behind_proxy,
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router owned every sender; the worker ends once the queue is drained.
    if tokio::time::timeout(WORKER_DRAIN_TIMEOUT, worker)
        .await
        .is_err()
    {
        tracing::warn!("Notification worker did not drain in time");
    }

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Redis when `REDIS_URL` is set, in-process otherwise.
///
/// An unreachable Redis disables caching instead of falling back to a
/// per-process store, which would diverge between instances.
async fn build_cache_store(config: &Config) -> Arc<dyn CacheService> {
    match &config.redis_url {
        Some(redis_url) => match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Caching disabled.", e);
                Arc::new(NullCache::new())
            }
        },
        None => {
            tracing::info!("Cache enabled (in-memory)");
            Arc::new(MemoryCache::new(Some(Duration::from_secs(
                config.cache_ttl_seconds,
            ))))
        }
    }
}

fn build_notifier(config: &Config) -> Result<Arc<dyn Notifier>> {
    Ok(match &config.notification_webhook_url {
        Some(url) => {
            tracing::info!("Pingback notifications delivered to webhook");
            Arc::new(
                WebhookNotifier::new(url.clone(), WEBHOOK_TIMEOUT)
                    .context("Failed to build webhook client")?,
            )
        }
        None => Arc::new(LogNotifier),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
