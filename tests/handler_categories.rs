mod common;

use axum::http::StatusCode;
use axum::{Router, middleware};
use axum_test::TestServer;
use blog_engine::api;
use blog_engine::api::middleware::auth;
use common::{ADMIN_TOKEN, StubSourceInspector};
use serde_json::{Value, json};

fn server() -> TestServer {
    let ctx = common::create_test_state(StubSourceInspector::default());
    let app = Router::new()
        .nest(
            "/api",
            api::routes::protected_routes().route_layer(middleware::from_fn_with_state(
                ctx.state.clone(),
                auth::layer,
            )),
        )
        .with_state(ctx.state);

    TestServer::new(app).unwrap()
}

fn bearer() -> String {
    format!("Bearer {ADMIN_TOKEN}")
}

async fn create(server: &TestServer, body: Value) -> axum_test::TestResponse {
    server
        .post("/api/categories")
        .add_header("Authorization", bearer())
        .json(&body)
        .await
}

#[tokio::test]
async fn test_create_and_lookup_by_route_name() {
    let server = server();

    let response = create(
        &server,
        json!({ "route_name": " dotnet ", "display_name": ".NET", "note": "  " }),
    )
    .await;
    response.assert_status(StatusCode::CREATED);

    let created = response.json::<Value>();
    assert_eq!(created["route_name"], "dotnet");
    assert!(created.get("note").is_none());

    let found = server
        .get("/api/categories/DotNet")
        .add_header("Authorization", bearer())
        .await;
    found.assert_status_ok();
    assert_eq!(found.json::<Value>()["id"], created["id"]);

    server
        .get("/api/categories/missing")
        .add_header("Authorization", bearer())
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_create_rejects_invalid_route_name() {
    let server = server();

    for route_name in ["Not Valid", "-edge", "ünicode"] {
        let response = create(
            &server,
            json!({ "route_name": route_name, "display_name": "Name" }),
        )
        .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
    }
}

#[tokio::test]
async fn test_duplicate_route_name_is_conflict() {
    let server = server();
    let body = json!({ "route_name": "rust", "display_name": "Rust" });

    create(&server, body.clone())
        .await
        .assert_status(StatusCode::CREATED);

    let response = create(&server, body).await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>()["error"]["details"]["constraint"],
        "categories_route_name_key"
    );
}

#[tokio::test]
async fn test_update_and_delete() {
    let server = server();

    let created = create(
        &server,
        json!({ "route_name": "misc", "display_name": "Misc" }),
    )
    .await
    .json::<Value>();
    let id = created["id"].as_str().unwrap().to_string();

    let updated = server
        .put(&format!("/api/categories/{id}"))
        .add_header("Authorization", bearer())
        .json(&json!({ "route_name": "other", "display_name": "Other", "note": "Leftovers" }))
        .await;
    updated.assert_status_ok();
    assert_eq!(updated.json::<Value>()["note"], "Leftovers");

    let listed = server
        .get("/api/categories")
        .add_header("Authorization", bearer())
        .await
        .json::<Vec<Value>>();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["route_name"], "other");

    server
        .delete(&format!("/api/categories/{id}"))
        .add_header("Authorization", bearer())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .delete(&format!("/api/categories/{id}"))
        .add_header("Authorization", bearer())
        .await
        .assert_status_not_found();
}
