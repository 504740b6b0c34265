/**
 * WebSocket Connection Handler
 *
 * `GET /messages` upgrades an authenticated request to a WebSocket. Each
 * connection runs on its own task:
 *
 * - a writer task drains the connection's outbound queue into the socket
 * - the reader loop handles inbound frames one at a time, in arrival order
 *
 * The connection is registered with the presence registry after the
 * upgrade and released when the reader loop ends, whatever the reason
 * (client close, socket error, or supersession by a newer connection).
 * An operation already in flight when the client drops runs to completion
 * before the release.
 */

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};

use super::dispatch::dispatch_text;
use crate::backend::auth::Identity;
use crate::backend::chat::ChatHub;
use crate::backend::error::ChatError;
use crate::backend::middleware::AuthIdentity;
use crate::backend::presence::ConnectionHandle;
use crate::backend::server::state::AppState;
use crate::shared::ServerEvent;

/// Upgrade handler for `GET /messages`
///
/// Authentication runs in the `AuthIdentity` extractor, before the upgrade.
pub async fn handle_socket_upgrade(
    State(state): State<AppState>,
    AuthIdentity(identity): AuthIdentity,
    ws: WebSocketUpgrade,
) -> Response {
    tracing::info!("[Socket] Upgrading connection for user {}", identity.user_id);
    let hub = state.hub.clone();
    ws.on_upgrade(move |socket| run_connection(hub, identity, socket))
}

/// Drive one authenticated connection until it closes
pub async fn run_connection(hub: ChatHub, identity: Identity, socket: WebSocket) {
    let user_id = identity.user_id;
    let (handle, mut outbound) = ConnectionHandle::new(user_id);
    let connection_id = handle.id();
    let (mut sink, mut stream) = socket.split();

    let mut writer = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let text = match event.to_json() {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("[Socket] Failed to encode event: {}", e);
                    continue;
                }
            };
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
            if matches!(event, ServerEvent::SessionReplaced) {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
        }
    });

    hub.presence().register(handle.clone()).await;
    tracing::info!("[Socket] Connection {} open for user {}", connection_id, user_id);

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Some(reply) = dispatch_text(&hub, user_id, text.as_str()).await {
                        handle.send(reply);
                    }
                }
                Some(Ok(Message::Binary(_))) => {
                    handle.send(ChatError::validation("Binary frames are not supported").into());
                }
                Some(Ok(Message::Close(_))) | None => break,
                // Ping/pong are answered by the transport
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!("[Socket] Connection {} read error: {}", connection_id, e);
                    break;
                }
            },
            _ = &mut writer => {
                tracing::debug!("[Socket] Writer for connection {} finished", connection_id);
                break;
            }
        }
    }

    hub.presence().release(user_id, connection_id).await;
    writer.abort();
    tracing::info!("[Socket] Connection {} closed for user {}", connection_id, user_id);
}
