//! Conversation Summary
//!
//! Derived per-user view of one room. Never stored; rebuilt on every
//! aggregation.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::ChatMessage;
use super::user::ParticipantProfile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub room_id: Uuid,
    /// The participant that is not the viewing user
    pub other_user: ParticipantProfile,
    pub last_message: Option<ChatMessage>,
    pub last_message_at: Option<DateTime<Utc>>,
    /// Messages addressed to the viewing user that are still unread
    pub unread_count: i64,
}

impl ConversationSummary {
    pub fn new(
        room_id: Uuid,
        other_user: ParticipantProfile,
        last_message: Option<ChatMessage>,
        unread_count: i64,
    ) -> Self {
        let last_message_at = last_message.as_ref().map(|m| m.created_at);
        Self {
            room_id,
            other_user,
            last_message,
            last_message_at,
            unread_count,
        }
    }

    /// Most recent activity first; rooms without messages go last
    pub fn recency_order(a: &Self, b: &Self) -> Ordering {
        match (a.last_message_at, b.last_message_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Sort summaries by recency
///
/// The sort is stable, so rooms without any message keep their input order.
pub fn sort_by_recency(summaries: &mut [ConversationSummary]) {
    summaries.sort_by(ConversationSummary::recency_order);
}
