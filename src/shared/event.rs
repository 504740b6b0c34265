/**
 * Socket Event Protocol
 *
 * This module defines the JSON frames exchanged over the chat WebSocket.
 * Every frame is an object with an `event` name and an optional `data`
 * payload:
 *
 * ```json
 * { "event": "sendMessage", "data": { "receiver_id": "...", "body": "hi" } }
 * ```
 *
 * # Inbound (client → server)
 *
 * - `sendMessage` - Send a message to another user
 * - `fetchHistory` - Load a conversation and mark it read
 * - `listConversations` - Load the ordered conversation list
 * - `unreadQuery` - Peek at unread messages from one user
 *
 * # Outbound (server → client)
 *
 * - `message`, `history`, `noConversation`, `conversations`, `unread`,
 *   `noUnread` - Replies and pushes for the operations above
 * - `userStatus`, `onlineUsers` - Presence broadcasts
 * - `error` - A failed operation, reported to the originating connection only
 * - `sessionReplaced` - Sent to a connection superseded by a newer login
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::messaging::{ChatMessage, ConversationSummary, ParticipantProfile};

/// Event received from a client connection
///
/// Required fields are modelled as `Option` so that a missing field is
/// reported as a validation error naming the field, not as a parse failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    SendMessage {
        #[serde(default)]
        receiver_id: Option<Uuid>,
        #[serde(default)]
        body: Option<String>,
        #[serde(default)]
        attachments: Vec<String>,
    },
    FetchHistory {
        #[serde(default)]
        other_user_id: Option<Uuid>,
    },
    ListConversations,
    UnreadQuery {
        #[serde(default)]
        other_user_id: Option<Uuid>,
    },
}

impl ClientEvent {
    /// Parse a text frame
    pub fn parse(text: &str) -> Result<Self, SharedError> {
        serde_json::from_str(text).map_err(SharedError::from)
    }

    /// Event name, for logging
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::SendMessage { .. } => "sendMessage",
            ClientEvent::FetchHistory { .. } => "fetchHistory",
            ClientEvent::ListConversations => "listConversations",
            ClientEvent::UnreadQuery { .. } => "unreadQuery",
        }
    }
}

/// Unwrap a required field or produce a validation error for it
pub fn require<T>(field: &'static str, value: Option<T>) -> Result<T, SharedError> {
    value.ok_or_else(|| SharedError::invalid(field, format!("{} is required", field)))
}

/// Event pushed to a client connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// A newly stored message, delivered to both participants
    Message(ChatMessage),
    History {
        messages: Vec<ChatMessage>,
        other_user: ParticipantProfile,
    },
    NoConversation {
        message: String,
    },
    Conversations(Vec<ConversationSummary>),
    Unread {
        messages: Vec<ChatMessage>,
        count: usize,
    },
    NoUnread {
        message: String,
    },
    UserStatus {
        user_id: Uuid,
        is_online: bool,
    },
    OnlineUsers(Vec<Uuid>),
    Error {
        kind: String,
        message: String,
        retryable: bool,
    },
    SessionReplaced,
}

impl ServerEvent {
    /// Serialize to a text frame
    pub fn to_json(&self) -> Result<String, SharedError> {
        serde_json::to_string(self).map_err(SharedError::from)
    }
}
