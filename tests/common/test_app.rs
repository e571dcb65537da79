//! In-process application
//!
//! `TestApp` serves the real router through `axum-test` and keeps the
//! `AppState` so tests can open gateway sessions against the same presence
//! registry the REST handlers notify.

use axum_test::TestServer;
use serde_json::Value;
use utasks_chat::backend::realtime::broadcast::{outbox, Inbox};
use utasks_chat::backend::realtime::Session;
use utasks_chat::backend::routes::create_router;
use utasks_chat::backend::server::{AppState, ServerConfig};
use utasks_chat::shared::ServerEvent;

use super::auth_helpers::{create_test_user, TestUser, TEST_SECRET};
use super::database::TestDatabase;

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

/// A live connection: the gateway session plus its outbound queue
pub struct TestConnection {
    pub session: Session,
    pub inbox: Inbox,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = TestDatabase::new().await;
        let state = AppState::new(db.pool().clone(), ServerConfig::for_tests(TEST_SECRET));
        let server = TestServer::new(create_router(state.clone())).expect("Failed to start test server");
        Self { server, state }
    }

    /// The same application served over a real port, for WebSocket clients
    pub fn socket_server(&self) -> TestServer {
        TestServer::builder()
            .http_transport()
            .build(create_router(self.state.clone()))
            .expect("Failed to start socket test server")
    }

    pub async fn user(&self, username: &str) -> TestUser {
        create_test_user(&self.state.pool, username).await
    }

    /// Open a gateway session the way the socket handler does
    pub async fn connect(&self, user: &TestUser) -> TestConnection {
        let pending = self
            .state
            .gateway
            .authenticate(Some(&user.token))
            .await
            .expect("Handshake should succeed");
        let (tx, inbox) = outbox();
        let session = pending.open(tx).await;
        TestConnection { session, inbox }
    }
}

impl TestConnection {
    /// Send one raw frame as if it arrived on the socket
    pub async fn send(&self, frame: Value) {
        self.session.dispatch(&frame.to_string()).await;
    }

    /// Everything queued for this connection so far
    pub fn drain(&mut self) -> Vec<ServerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.inbox.try_recv() {
            events.push(event);
        }
        events
    }

    pub async fn close(&mut self) {
        self.session.close().await;
    }
}
