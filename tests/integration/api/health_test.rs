//! Health, fallback and authentication tests

use axum::http::StatusCode;
use serde_json::Value;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_reports_online_users() {
    let app = TestApp::new().await;
    let alice = app.user("alice").await;

    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["onlineUsers"], 0);

    let _conn = app.connect(&alice).await;
    let body = app.server.get("/health").await.json::<Value>();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["onlineUsers"], 1);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    let response = app.server.get("/api/groups").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Authentication required");

    let response = app
        .server
        .get("/api/chat/users/online")
        .authorization_bearer("not-a-token")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_socket_handshake_rejects_bad_token() {
    let app = TestApp::new().await;

    let response = app.server.get("/ws").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app.server.get("/ws").add_query_param("token", "garbage").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["success"], false);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new().await;
    let response = app.server.get("/api/nothing-here").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["success"], false);
}
