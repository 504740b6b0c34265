/**
 * Event Dispatch
 *
 * Maps one inbound `ClientEvent` to a chat operation and the reply for the
 * originating connection. Errors become an `error` event for that
 * connection only.
 *
 * `sendMessage` has no direct reply: the stored message reaches the sender
 * through the pair channel, like it reaches the receiver.
 */

use uuid::Uuid;

use crate::backend::chat::{ChatHub, HistoryOutcome};
use crate::backend::error::{ChatError, ChatResult};
use crate::shared::event::require;
use crate::shared::{ClientEvent, ServerEvent};

const NO_CONVERSATION: &str = "No conversation yet";
const NO_UNREAD: &str = "No unread messages";

/// Handle one event from `user_id` and produce the reply, if any
pub async fn dispatch(hub: &ChatHub, user_id: Uuid, event: ClientEvent) -> Option<ServerEvent> {
    let name = event.name();
    match handle(hub, user_id, event).await {
        Ok(reply) => reply,
        Err(err) => {
            if err.is_retryable() {
                tracing::error!("[Dispatch] {} from {} failed: {}", name, user_id, err);
            } else {
                tracing::warn!("[Dispatch] {} from {} rejected: {}", name, user_id, err);
            }
            Some(ServerEvent::from(err))
        }
    }
}

/// Parse a text frame and dispatch it
pub async fn dispatch_text(hub: &ChatHub, user_id: Uuid, text: &str) -> Option<ServerEvent> {
    match ClientEvent::parse(text) {
        Ok(event) => dispatch(hub, user_id, event).await,
        Err(e) => {
            tracing::debug!("[Dispatch] Unparseable frame from {}: {}", user_id, e);
            Some(ServerEvent::from(ChatError::validation(
                "Malformed event frame",
            )))
        }
    }
}

async fn handle(hub: &ChatHub, user_id: Uuid, event: ClientEvent) -> ChatResult<Option<ServerEvent>> {
    match event {
        ClientEvent::SendMessage {
            receiver_id,
            body,
            attachments,
        } => {
            let receiver_id = require("receiver_id", receiver_id)?;
            let body = require("body", body)?;
            hub.send(user_id, receiver_id, body, attachments).await?;
            Ok(None)
        }
        ClientEvent::FetchHistory { other_user_id } => {
            let other_user_id = require("other_user_id", other_user_id)?;
            let reply = match hub.fetch_history(user_id, other_user_id).await? {
                HistoryOutcome::NoConversation { .. } => ServerEvent::NoConversation {
                    message: NO_CONVERSATION.to_string(),
                },
                HistoryOutcome::Conversation {
                    messages, other_user, ..
                } => ServerEvent::History {
                    messages,
                    other_user,
                },
            };
            Ok(Some(reply))
        }
        ClientEvent::ListConversations => {
            let summaries = hub.list_conversations(user_id).await?;
            Ok(Some(ServerEvent::Conversations(summaries)))
        }
        ClientEvent::UnreadQuery { other_user_id } => {
            let other_user_id = require("other_user_id", other_user_id)?;
            let messages = hub.unread_since(user_id, other_user_id).await?;
            let reply = if messages.is_empty() {
                ServerEvent::NoUnread {
                    message: NO_UNREAD.to_string(),
                }
            } else {
                ServerEvent::Unread {
                    count: messages.len(),
                    messages,
                }
            };
            Ok(Some(reply))
        }
    }
}
