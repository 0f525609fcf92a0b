use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use record_locking_core::error::CoreError;
use record_locking_core::protocol::{ClientMessage, ServerMessage};
use record_locking_core::types::UserId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::{authenticate, bearer_token};
use crate::state::AppState;

/// Query parameters accepted on the upgrade request. Browsers cannot set
/// headers on a WebSocket handshake, so the token may ride in the URL.
#[derive(Debug, Default, Deserialize)]
pub struct WsAuthQuery {
    pub token: Option<String>,
}

/// HTTP handler that authenticates and upgrades the connection to WebSocket.
///
/// The token comes from `?token=` when present, otherwise from the
/// `Authorization` header. Requests without a valid token get a 401 and are
/// never upgraded.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<WsAuthQuery>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let token = match query.token.as_deref() {
        Some(token) => token,
        None => bearer_token(&headers)?,
    };
    let user = authenticate(token, &state.config.jwt)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user.user_id)))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Frames are applied one at a time on this task, so every lock this
/// connection opened is in the store before the disconnect cleanup runs. The
/// session ends on a close frame, a receive error, or once the outbound side
/// stops (sink failure or heartbeat eviction).
async fn handle_socket(socket: WebSocket, state: AppState, user_id: UserId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connected");

    let mut rx = state.ws_manager.add(conn_id.clone(), user_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink. It ends
    // when the sink fails or when the manager drops this connection.
    let sender_conn_id = conn_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    loop {
        tokio::select! {
            frame = stream.next() => {
                let Some(result) = frame else { break };
                match result {
                    Ok(Message::Text(text)) => {
                        state.ws_manager.touch(&conn_id).await;
                        handle_frame(&state, &conn_id, &user_id, text.as_str()).await;
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(Message::Pong(_)) => {
                        tracing::trace!(conn_id = %conn_id, "Pong received");
                        state.ws_manager.touch(&conn_id).await;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                        break;
                    }
                }
            }
            // A dead sink or an eviction means the peer is gone even if no
            // close frame ever arrives.
            _ = &mut send_task => {
                tracing::debug!(conn_id = %conn_id, "Outbound side finished, ending session");
                break;
            }
        }
    }

    state.ws_manager.remove(&conn_id).await;
    match state.registry.release_by_connection(&conn_id).await {
        Ok(released) => {
            tracing::info!(conn_id = %conn_id, released, "WebSocket disconnected");
        }
        Err(e) => {
            tracing::error!(
                conn_id = %conn_id,
                error = %e,
                "Failed to release locks for closed connection"
            );
        }
    }
    send_task.abort();
}

/// Apply one text frame from the client.
async fn handle_frame(state: &AppState, conn_id: &str, user_id: &UserId, raw: &str) {
    let message: ClientMessage = match serde_json::from_str(raw) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Unparseable WebSocket frame");
            reply_error(state, conn_id, format!("Malformed message: {e}")).await;
            return;
        }
    };

    let target = match message.target() {
        Ok(target) => target,
        Err(e) => {
            reply_error(state, conn_id, e.to_string()).await;
            return;
        }
    };

    let result = match &message {
        ClientMessage::OpenEntity { .. } => {
            state.registry.acquire(user_id, &target, Some(conn_id)).await
        }
        ClientMessage::CloseEntity {
            user_id: claimed, ..
        } => {
            if let Some(claimed) = claimed.as_ref().filter(|claimed| *claimed != user_id) {
                tracing::warn!(
                    conn_id = %conn_id,
                    user_id = %user_id,
                    claimed_user_id = %claimed,
                    "closeEntity names another user; using the socket's user"
                );
            }
            state.registry.release(user_id, &target).await.map(|_| ())
        }
    };

    match result {
        Ok(()) | Err(CoreError::PermissionDenied { .. }) => {}
        Err(e) => {
            tracing::error!(conn_id = %conn_id, error = %e, "Lock event failed");
            reply_error(state, conn_id, "Lock state could not be updated".into()).await;
        }
    }
}

async fn reply_error(state: &AppState, conn_id: &str, message: String) {
    let frame = match serde_json::to_string(&ServerMessage::Error { message }) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode error frame");
            return;
        }
    };
    state
        .ws_manager
        .send_to(conn_id, Message::Text(frame.into()))
        .await;
}
