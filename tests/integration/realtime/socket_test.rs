//! WebSocket transport tests
//!
//! A real client against the router served on a local port, checking frame
//! decoding, event encoding and unregistration when the socket closes.

use std::time::Duration;

use axum_test::TestWebSocket;
use pretty_assertions::assert_eq;
use serde_json::json;
use utasks_chat::shared::{RoomKey, ServerEvent};

use crate::common::{TestApp, TestConnection};

const WAIT: Duration = Duration::from_secs(5);

async fn next_event(socket: &mut TestWebSocket) -> ServerEvent {
    tokio::time::timeout(WAIT, socket.receive_json::<ServerEvent>())
        .await
        .expect("timed out waiting for a socket frame")
}

async fn next_queued(conn: &mut TestConnection) -> ServerEvent {
    tokio::time::timeout(WAIT, conn.inbox.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("outbox closed")
}

#[tokio::test]
async fn test_socket_round_trip_and_close() {
    let app = TestApp::new().await;
    let server = app.socket_server();
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;

    let mut socket = server
        .get_websocket("/ws")
        .add_query_param("token", &alice.token)
        .await
        .into_websocket()
        .await;

    assert!(matches!(next_event(&mut socket).await, ServerEvent::UserConnected(change) if change.user_id == alice.id));
    match next_event(&mut socket).await {
        ServerEvent::UsersOnline(users) => {
            assert_eq!(users.len(), 1);
            assert_eq!(users[0].user_id, alice.id);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(app.state.presence.is_online(alice.id).await);

    let mut bob_conn = app.connect(&bob).await;
    bob_conn.drain();
    assert!(matches!(next_event(&mut socket).await, ServerEvent::UserConnected(change) if change.user_id == bob.id));

    socket
        .send_json(&json!({
            "event": "message:private",
            "data": { "content": "over the wire", "recipientId": bob.id }
        }))
        .await;
    match next_event(&mut socket).await {
        ServerEvent::PrivateMessageReceived(message) => {
            assert_eq!(message.content, "over the wire");
            assert_eq!(message.room_key(), Some(RoomKey::private(alice.id, bob.id)));
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(matches!(
        next_queued(&mut bob_conn).await,
        ServerEvent::PrivateMessageReceived(message) if message.sender == alice.id
    ));

    socket.send_text("not json").await;
    assert!(matches!(next_event(&mut socket).await, ServerEvent::Error(_)));

    socket.close().await;
    match next_queued(&mut bob_conn).await {
        ServerEvent::UserDisconnected(change) => {
            assert_eq!(change.user_id, alice.id);
            assert_eq!(change.connected_users.len(), 1);
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(!app.state.presence.is_online(alice.id).await);
}

#[tokio::test]
async fn test_socket_accepts_bearer_header() {
    let app = TestApp::new().await;
    let server = app.socket_server();
    let alice = app.user("alice").await;

    let mut socket = server
        .get_websocket("/ws")
        .authorization_bearer(&alice.token)
        .await
        .into_websocket()
        .await;

    assert!(matches!(next_event(&mut socket).await, ServerEvent::UserConnected(_)));
    assert!(matches!(next_event(&mut socket).await, ServerEvent::UsersOnline(users) if users.len() == 1));
}
