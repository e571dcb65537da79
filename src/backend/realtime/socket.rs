/**
 * WebSocket Transport
 *
 * HTTP upgrade handler for `GET /ws`. The handshake credential is verified
 * before the upgrade, so an unauthenticated client gets a plain 401 JSON
 * response and never holds a socket.
 *
 * # Credential Sources
 *
 * 1. `token` query parameter (`/ws?token=<jwt>`)
 * 2. `Authorization: Bearer <jwt>` header
 *
 * # Tasks
 *
 * Each upgraded socket runs a writer task that drains the connection outbox
 * into text frames, and a reader loop that hands every text frame to the
 * connection's `Session`, one at a time.
 */

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{header::AUTHORIZATION, HeaderMap},
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::backend::error::BackendError;
use crate::backend::realtime::broadcast::outbox;
use crate::backend::realtime::gateway::{Gateway, PendingConnection};

#[derive(Debug, Default, Deserialize)]
pub struct HandshakeQuery {
    #[serde(default)]
    pub token: Option<String>,
}

/// Authenticate, then upgrade
pub async fn websocket_handler(
    State(gateway): State<Gateway>,
    Query(query): Query<HandshakeQuery>,
    headers: HeaderMap,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, BackendError> {
    let credential = query.token.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    });

    let pending = match gateway.accept().authenticate(credential.as_deref()).await {
        Ok(pending) => pending,
        Err(e) => {
            tracing::warn!("[Gateway] Handshake rejected: {}", e);
            return Err(e);
        }
    };

    match upgrade {
        Ok(ws) => Ok(ws.on_upgrade(move |socket| run_connection(socket, pending))),
        Err(rejection) => Ok(rejection.into_response()),
    }
}

async fn run_connection(socket: WebSocket, pending: PendingConnection) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = outbox();
    let mut session = pending.open(tx).await;

    let mut writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let frame = match serde_json::to_string(&event) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::error!("[Gateway] Failed to encode {}: {}", event.name(), e);
                    continue;
                }
            };
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => session.dispatch(text.as_str()).await,
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!("[Gateway] Socket error for {}: {}", session.identity().username, e);
                    break;
                }
            },
            _ = &mut writer => break,
        }
    }

    session.close().await;
    writer.abort();
}
