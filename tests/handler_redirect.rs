mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use common::{bearer, memory_app};

#[tokio::test]
async fn test_redirect_success_counts_click() {
    let app = memory_app();
    let server = app.server();

    let created: Value = server
        .post("/urls")
        .json(&json!({ "originalUrl": "https://example.com/target" }))
        .await
        .json();
    let code = created["shortCode"].as_str().unwrap();

    let response = server.get(&format!("/{code}")).await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://example.com/target");

    let link = app.links.find_active_by_code(code).await.unwrap().unwrap();
    assert_eq!(link.clicks, 1);
}

#[tokio::test]
async fn test_redirect_counts_every_visit() {
    let app = memory_app();
    let server = app.server();

    let created: Value = server
        .post("/urls")
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await
        .json();
    let code = created["shortCode"].as_str().unwrap();

    for _ in 0..3 {
        assert_eq!(
            server.get(&format!("/{code}")).await.status_code(),
            StatusCode::FOUND
        );
    }

    let link = app.links.find_active_by_code(code).await.unwrap().unwrap();
    assert_eq!(link.clicks, 3);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let server = memory_app().server();

    let response = server.get("/Zz9Zz9").await;

    response.assert_status_not_found();

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_malformed_code_not_found() {
    let server = memory_app().server();

    server.get("/abc").await.assert_status_not_found();
    server.get("/abc-12").await.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_after_delete_not_found() {
    let app = memory_app();
    let (_, token) = app.create_owner("ci").await;
    let server = app.server();

    let created: Value = server
        .post("/urls")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await
        .json();
    let code = created["shortCode"].as_str().unwrap();
    let id = created["id"].as_str().unwrap();

    server
        .delete(&format!("/urls/{id}"))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();

    server.get(&format!("/{code}")).await.assert_status_not_found();

    let id: Uuid = id.parse().unwrap();
    assert!(app.links.find_active_by_id(id).await.unwrap().is_none());
    assert_eq!(app.links.stats().await.unwrap().total_clicks, 0);
}

#[tokio::test]
async fn test_redirect_follows_updated_destination() {
    let app = memory_app();
    let (_, token) = app.create_owner("ci").await;
    let server = app.server();

    let created: Value = server
        .post("/urls")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "originalUrl": "https://old.example.com" }))
        .await
        .json();
    let code = created["shortCode"].as_str().unwrap();
    let id = created["id"].as_str().unwrap();

    server
        .patch(&format!("/urls/{id}"))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "url": "https://new.example.com" }))
        .await
        .assert_status_ok();

    let response = server.get(&format!("/{code}")).await;

    assert_eq!(response.status_code(), StatusCode::FOUND);
    assert_eq!(response.header("location"), "https://new.example.com");
}

#[tokio::test]
async fn test_health_route_is_not_a_code() {
    let server = memory_app().server();

    server.get("/health").await.assert_status_ok();
}
