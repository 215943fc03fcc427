mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use blog_engine::api::handlers::health_handler;
use common::StubSourceInspector;

#[tokio::test]
async fn test_health_check_success() {
    let ctx = common::create_test_state(StubSourceInspector::default());
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(ctx.state.clone());

    let server = TestServer::new(app).unwrap();
    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert!(
        json["checks"]["cache"]["message"]
            .as_str()
            .unwrap()
            .starts_with("memory")
    );
    assert_eq!(json["checks"]["notification_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_worker_gone() {
    let ctx = common::create_test_state(StubSourceInspector::default());
    let state = ctx.state.clone();
    drop(ctx.notifications);

    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();
    let response = server.get("/health").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["notification_queue"]["status"], "error");
}
