/**
 * Message Gateway
 *
 * Orchestrates a send. Steps run strictly in this order:
 *
 * 1. Validate the draft (body, attachment limits)
 * 2. Load fresh sender and receiver snapshots
 * 3. Evaluate the access policy; a denial stops here with no side effects
 * 4. Resolve or create the room
 * 5. Durably append the message; from here on the send has succeeded
 * 6. Join both live connections to the pair channel and emit `message`
 *    (5 and 6 run under the room lock, so emits follow store order)
 * 7. Push refreshed conversation lists to the online participants
 *
 * A storage failure in step 5 aborts the send and is reported to the
 * sender as retryable. Steps 6 and 7 only log their failures.
 */

use chrono::Utc;
use uuid::Uuid;

use super::policy::{can_exchange, AccessDecision};
use super::ChatHub;
use crate::backend::error::{ChatError, ChatResult};
use crate::shared::messaging::{ChatMessage, NewMessage, Room};
use crate::shared::ServerEvent;

impl ChatHub {
    /// Send a message from `sender_id` to `receiver_id`
    ///
    /// # Arguments
    ///
    /// * `sender_id` - Authenticated user sending the message
    /// * `receiver_id` - Recipient
    /// * `body` - Message text
    /// * `attachments` - Attachment references, possibly empty
    ///
    /// # Returns
    ///
    /// The stored message, as delivered to both participants
    pub async fn send(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        body: String,
        attachments: Vec<String>,
    ) -> ChatResult<ChatMessage> {
        // Room id is filled in once the room is resolved
        let mut draft = NewMessage {
            room_id: Uuid::nil(),
            sender_id,
            receiver_id,
            body,
            attachments,
        };
        let limits = self.limits();
        draft.validate(limits.max_message_length, limits.max_attachments)?;

        let sender = self.load_user(sender_id).await?;
        let receiver = self.load_user(receiver_id).await?;

        if let AccessDecision::Denied(reason) = can_exchange(&sender, &receiver, Utc::now()) {
            tracing::warn!(
                "[Gateway] Send from {} to {} denied: {}",
                sender_id,
                receiver_id,
                reason
            );
            return Err(ChatError::PolicyDenied(reason));
        }

        let room = self.resolver().resolve_or_create(sender_id, receiver_id).await?;
        draft.room_id = room.id;

        let message = {
            let _turn = self.room_locks().lock(room.id).await;
            let message = self.store().append_message(draft).await.map_err(|e| {
                tracing::error!("[Gateway] Failed to store message in room {}: {}", room.id, e);
                ChatError::from(e)
            })?;
            tracing::info!(
                "[Gateway] Message {} stored in room {} (seq {})",
                message.id,
                room.id,
                message.seq
            );
            self.deliver(&room, &message).await;
            message
        };
        self.refresh_conversations(&[sender_id, receiver_id]).await;

        Ok(message)
    }

    /// Emit a stored message on the pair channel
    async fn deliver(&self, room: &Room, message: &ChatMessage) {
        let channel = room.channel_name();
        for user_id in [message.sender_id, message.receiver_id] {
            if !self.presence().join(user_id, &channel).await {
                tracing::debug!("[Gateway] User {} offline, message kept for later fetch", user_id);
            }
        }

        let delivered = self
            .presence()
            .emit_to_channel(&channel, &ServerEvent::Message(message.clone()))
            .await;
        tracing::debug!(
            "[Gateway] Message {} delivered to {} connection(s)",
            message.id,
            delivered
        );
    }
}
