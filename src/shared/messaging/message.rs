//! Chat Message
//!
//! Messages are immutable once stored. Within a room they are ordered by
//! `created_at`, ties broken by the store-assigned `seq`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// A stored chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message ID
    pub id: Uuid,
    /// Insertion sequence assigned by the store
    pub seq: i64,
    /// Room the message belongs to
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub body: String,
    /// Attachment references (URLs or upload keys)
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Set once the receiver has opened the conversation
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Ordering key within a room
    pub fn order_key(&self) -> (DateTime<Utc>, i64) {
        (self.created_at, self.seq)
    }
}

/// A message that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub room_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub body: String,
    pub attachments: Vec<String>,
}

impl NewMessage {
    /// Check body and attachment limits
    ///
    /// # Arguments
    ///
    /// * `max_length` - Maximum body length in bytes
    /// * `max_attachments` - Maximum number of attachment references
    pub fn validate(&self, max_length: usize, max_attachments: usize) -> Result<(), SharedError> {
        if self.body.trim().is_empty() {
            return Err(SharedError::invalid("body", "Message body is required"));
        }
        if self.body.len() > max_length {
            return Err(SharedError::invalid(
                "body",
                format!("Message body exceeds {} bytes", max_length),
            ));
        }
        if self.attachments.len() > max_attachments {
            return Err(SharedError::invalid(
                "attachments",
                format!("At most {} attachments are allowed", max_attachments),
            ));
        }
        if self.attachments.iter().any(|a| a.trim().is_empty()) {
            return Err(SharedError::invalid(
                "attachments",
                "Attachment references cannot be empty",
            ));
        }
        Ok(())
    }
}
