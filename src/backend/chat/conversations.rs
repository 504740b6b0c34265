/**
 * Conversation List Aggregator
 *
 * Builds a user's conversation list from scratch on every call: all rooms
 * the user is in, each with its last message, unread count and the other
 * participant's public profile. Newest activity first; rooms without
 * messages last, in stable order.
 *
 * The full recompute is scoped to one user's rooms. It is the first thing
 * to replace with an incremental index if per-user room counts grow large.
 */

use std::collections::HashMap;

use futures_util::future::try_join_all;
use uuid::Uuid;

use super::ChatHub;
use crate::backend::error::ChatResult;
use crate::backend::store::StoreError;
use crate::shared::messaging::{sort_by_recency, ConversationSummary, ParticipantProfile, Room};
use crate::shared::ServerEvent;

impl ChatHub {
    /// Ordered conversation list for `user_id`
    pub async fn list_conversations(&self, user_id: Uuid) -> ChatResult<Vec<ConversationSummary>> {
        let rooms = self.store().list_rooms_for_user(user_id).await?;
        if rooms.is_empty() {
            return Ok(Vec::new());
        }

        let other_ids: Vec<Uuid> = rooms.iter().filter_map(|room| room.pair.other(user_id)).collect();
        let profiles: HashMap<Uuid, ParticipantProfile> = self
            .store()
            .find_users(&other_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.profile()))
            .collect();

        let mut summaries = try_join_all(
            rooms
                .iter()
                .map(|room| self.summarize(room, user_id, &profiles)),
        )
        .await?;

        sort_by_recency(&mut summaries);
        Ok(summaries)
    }

    async fn summarize(
        &self,
        room: &Room,
        user_id: Uuid,
        profiles: &HashMap<Uuid, ParticipantProfile>,
    ) -> Result<ConversationSummary, StoreError> {
        let (last_message, unread_count) = tokio::try_join!(
            self.store().last_message(room.id),
            self.store().count_unread(room.id, user_id),
        )?;

        let other_id = room.pair.other(user_id).unwrap_or(user_id);
        let other_user = profiles
            .get(&other_id)
            .cloned()
            .unwrap_or_else(|| ParticipantProfile::unknown(other_id));

        Ok(ConversationSummary::new(room.id, other_user, last_message, unread_count))
    }

    /// Push a fresh conversation list to one user's live connection
    ///
    /// # Returns
    ///
    /// Whether the user was online to receive it
    pub async fn push_conversations(&self, user_id: Uuid) -> ChatResult<bool> {
        if !self.presence().is_online(user_id).await {
            return Ok(false);
        }
        let summaries = self.list_conversations(user_id).await?;
        Ok(self
            .presence()
            .send_to(user_id, ServerEvent::Conversations(summaries))
            .await)
    }

    /// Best-effort push to each user; failures are logged only
    pub async fn refresh_conversations(&self, user_ids: &[Uuid]) {
        for &user_id in user_ids {
            if let Err(e) = self.push_conversations(user_id).await {
                tracing::warn!(
                    "[Conversations] Failed to push conversation list to {}: {}",
                    user_id,
                    e
                );
            }
        }
    }
}
