/**
 * History & Unread Tracker
 *
 * - `fetch_history` opens a conversation: it marks every unread message
 *   addressed to the requester as read, then returns the full history.
 *   If the pair has never talked it reports `NoConversation`; it never
 *   creates a room.
 * - `unread_since` peeks at unread messages without marking them.
 */

use chrono::Utc;
use uuid::Uuid;

use super::policy::{can_exchange, AccessDecision};
use super::ChatHub;
use crate::backend::error::{ChatError, ChatResult};
use crate::shared::messaging::{ChatMessage, ParticipantProfile, Room};

/// Result of opening a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryOutcome {
    /// The pair has no room yet
    NoConversation { other_user: ParticipantProfile },
    Conversation {
        room: Room,
        messages: Vec<ChatMessage>,
        other_user: ParticipantProfile,
        /// How many messages this fetch marked as read
        marked_read: u64,
    },
}

impl ChatHub {
    /// Open the conversation between `user_id` and `other_user_id`
    pub async fn fetch_history(&self, user_id: Uuid, other_user_id: Uuid) -> ChatResult<HistoryOutcome> {
        let user = self.load_user(user_id).await?;
        let other = self.load_user(other_user_id).await?;

        if let AccessDecision::Denied(reason) = can_exchange(&user, &other, Utc::now()) {
            return Err(ChatError::PolicyDenied(reason));
        }

        let Some(room) = self.resolver().find(user_id, other_user_id).await? else {
            return Ok(HistoryOutcome::NoConversation {
                other_user: other.profile(),
            });
        };

        let marked_read = self.store().mark_read(room.id, user_id).await?;
        let messages = self.store().list_messages(room.id).await?;
        if marked_read > 0 {
            tracing::debug!(
                "[History] Marked {} message(s) read for {} in room {}",
                marked_read,
                user_id,
                room.id
            );
        }

        let channel = room.channel_name();
        self.presence().join(user_id, &channel).await;
        self.presence().join(other_user_id, &channel).await;
        self.refresh_conversations(&[user_id]).await;

        Ok(HistoryOutcome::Conversation {
            room,
            messages,
            other_user: other.profile(),
            marked_read,
        })
    }

    /// Unread messages from `other_user_id` to `user_id`, left unread
    pub async fn unread_since(&self, user_id: Uuid, other_user_id: Uuid) -> ChatResult<Vec<ChatMessage>> {
        self.load_user(user_id).await?;
        self.load_user(other_user_id).await?;

        let room = self
            .resolver()
            .find(user_id, other_user_id)
            .await?
            .ok_or_else(|| ChatError::not_found("conversation"))?;

        Ok(self.store().list_unread(room.id, user_id).await?)
    }
}
