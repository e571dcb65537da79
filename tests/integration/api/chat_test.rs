//! Chat API integration tests
//!
//! History, edit/delete and conversations over HTTP, with live connections
//! observing the notifications.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use utasks_chat::shared::{RoomKey, ServerEvent};

use crate::common::{TestApp, TestConnection, TestUser};

async fn send_private(conn: &TestConnection, to: &TestUser, content: &str) {
    conn.send(json!({
        "event": "message:private",
        "data": { "content": content, "recipientId": to.id }
    }))
    .await;
}

fn history_contents(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .map(|m| m["content"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_private_message_then_history() {
    let app = TestApp::new().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let mut alice_conn = app.connect(&alice).await;
    let mut bob_conn = app.connect(&bob).await;
    alice_conn.drain();
    bob_conn.drain();

    send_private(&alice_conn, &bob, "hi").await;

    let received = bob_conn.drain();
    assert_eq!(received.len(), 1);
    match &received[0] {
        ServerEvent::PrivateMessageReceived(message) => {
            assert_eq!(message.content, "hi");
            assert_eq!(message.sender, alice.id);
            assert_eq!(message.room_key(), Some(RoomKey::private(bob.id, alice.id)));
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert_eq!(alice_conn.drain().len(), 1);

    let response = app
        .server
        .get(&format!("/api/chat/private/{}", bob.id))
        .authorization_bearer(&alice.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    assert_eq!(history_contents(&body), vec!["hi"]);
}

#[tokio::test]
async fn test_room_history_pagination() {
    let app = TestApp::new().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let alice_conn = app.connect(&alice).await;

    for n in 1..=5 {
        send_private(&alice_conn, &bob, &format!("m{}", n)).await;
    }

    let room = RoomKey::private(alice.id, bob.id).to_string();
    let body = app
        .server
        .get(&format!("/api/chat/history/{}", room))
        .add_query_param("limit", 2)
        .authorization_bearer(&bob.token)
        .await
        .json::<Value>();
    assert_eq!(history_contents(&body), vec!["m4", "m5"]);

    let response = app
        .server
        .get("/api/chat/history/not-a-room")
        .authorization_bearer(&bob.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_cursor_does_not_skip_same_instant_messages() {
    let app = TestApp::new().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let alice_conn = app.connect(&alice).await;

    for n in 1..=4 {
        send_private(&alice_conn, &bob, &format!("m{}", n)).await;
    }
    sqlx::query("UPDATE messages SET created_at = (SELECT MAX(created_at) FROM messages)")
        .execute(&app.state.pool)
        .await
        .unwrap();

    let path = format!("/api/chat/private/{}", alice.id);
    let page = app
        .server
        .get(&path)
        .add_query_param("limit", 2)
        .authorization_bearer(&bob.token)
        .await
        .json::<Value>();
    assert_eq!(history_contents(&page), vec!["m3", "m4"]);

    let oldest_shown = page["data"][0]["id"].as_str().unwrap().to_string();
    let next = app
        .server
        .get(&path)
        .add_query_param("limit", 2)
        .add_query_param("beforeId", &oldest_shown)
        .authorization_bearer(&bob.token)
        .await
        .json::<Value>();
    assert_eq!(history_contents(&next), vec!["m1", "m2"]);

    let response = app
        .server
        .get(&path)
        .add_query_param("beforeId", uuid::Uuid::new_v4())
        .authorization_bearer(&bob.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_of_foreign_private_room_is_forbidden() {
    let app = TestApp::new().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let eve = app.user("eve").await;

    let room = RoomKey::private(alice.id, bob.id).to_string();
    let response = app
        .server
        .get(&format!("/api/chat/history/{}", room))
        .authorization_bearer(&eve.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_edit_by_non_sender_is_forbidden_and_changes_nothing() {
    let app = TestApp::new().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let mut alice_conn = app.connect(&alice).await;
    alice_conn.drain();
    send_private(&alice_conn, &bob, "original").await;
    let message_id = match alice_conn.drain().pop() {
        Some(ServerEvent::PrivateMessageReceived(message)) => message.id,
        other => panic!("unexpected event {:?}", other),
    };

    let response = app
        .server
        .put(&format!("/api/chat/messages/{}", message_id))
        .authorization_bearer(&bob.token)
        .json(&json!({ "content": "hijacked" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let body = app
        .server
        .get(&format!("/api/chat/private/{}", alice.id))
        .authorization_bearer(&bob.token)
        .await
        .json::<Value>();
    assert_eq!(body["data"][0]["content"], "original");
    assert_eq!(body["data"][0]["edited"], false);
}

#[tokio::test]
async fn test_edit_notifies_participants() {
    let app = TestApp::new().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let mut alice_conn = app.connect(&alice).await;
    let mut bob_conn = app.connect(&bob).await;
    alice_conn.drain();
    send_private(&alice_conn, &bob, "helo").await;
    let message_id = match bob_conn.drain().pop() {
        Some(ServerEvent::PrivateMessageReceived(message)) => message.id,
        other => panic!("unexpected event {:?}", other),
    };
    alice_conn.drain();

    let response = app
        .server
        .put(&format!("/api/chat/messages/{}", message_id))
        .authorization_bearer(&alice.token)
        .json(&json!({ "content": "hello" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["content"], "hello");
    assert_eq!(body["data"]["edited"], true);

    for conn in [&mut alice_conn, &mut bob_conn] {
        match conn.drain().as_slice() {
            [ServerEvent::MessageUpdated(message)] => assert_eq!(message.content, "hello"),
            other => panic!("unexpected events {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_delete_removes_from_history_and_scopes_audience() {
    let app = TestApp::new().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let carol = app.user("carol").await;
    let mut alice_conn = app.connect(&alice).await;
    let mut bob_conn = app.connect(&bob).await;
    let mut carol_conn = app.connect(&carol).await;

    // carol shares another room with alice; she must not see this delete
    send_private(&alice_conn, &carol, "unrelated").await;
    send_private(&alice_conn, &bob, "secret").await;
    let message_id = match bob_conn.drain().pop() {
        Some(ServerEvent::PrivateMessageReceived(message)) => message.id,
        other => panic!("unexpected event {:?}", other),
    };
    alice_conn.drain();
    carol_conn.drain();

    let response = app
        .server
        .delete(&format!("/api/chat/messages/{}", message_id))
        .authorization_bearer(&alice.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["id"], message_id.to_string());
    assert!(body["data"].get("content").is_none());

    assert!(matches!(bob_conn.drain().as_slice(), [ServerEvent::MessageDeleted(d)] if d.id == message_id));
    assert!(matches!(alice_conn.drain().as_slice(), [ServerEvent::MessageDeleted(_)]));
    assert!(carol_conn.drain().is_empty());

    let body = app
        .server
        .get(&format!("/api/chat/private/{}", bob.id))
        .authorization_bearer(&alice.token)
        .await
        .json::<Value>();
    assert!(history_contents(&body).is_empty());

    let response = app
        .server
        .delete(&format!("/api/chat/messages/{}", message_id))
        .authorization_bearer(&alice.token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_conversations_and_online_users() {
    let app = TestApp::new().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    let carol = app.user("carol").await;
    let alice_conn = app.connect(&alice).await;
    let _bob_conn = app.connect(&bob).await;

    send_private(&alice_conn, &bob, "to bob").await;
    send_private(&alice_conn, &carol, "to carol").await;

    let body = app
        .server
        .get("/api/chat/conversations")
        .authorization_bearer(&alice.token)
        .await
        .json::<Value>();
    let conversations = body["data"].as_array().unwrap();
    assert_eq!(conversations.len(), 2);
    assert_eq!(conversations[0]["peer"], carol.id.to_string());
    assert_eq!(conversations[0]["lastMessage"]["content"], "to carol");

    let body = app
        .server
        .get("/api/chat/users/online")
        .authorization_bearer(&carol.token)
        .await
        .json::<Value>();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "bob"]);
}
