//! Room and canonical pair key

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Order-independent key for two distinct users
///
/// `(a, b)` and `(b, a)` produce the same key; `low` is always the smaller
/// uuid. Every room lookup or creation goes through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    low: Uuid,
    high: Uuid,
}

impl PairKey {
    /// Canonicalize two user ids
    ///
    /// # Errors
    ///
    /// Returns a validation error when both ids are the same user.
    pub fn new(a: Uuid, b: Uuid) -> Result<Self, SharedError> {
        if a == b {
            return Err(SharedError::invalid(
                "receiver_id",
                "A conversation needs two different users",
            ));
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { low, high })
    }

    pub fn low(&self) -> Uuid {
        self.low
    }

    pub fn high(&self) -> Uuid {
        self.high
    }

    pub fn contains(&self, user_id: Uuid) -> bool {
        self.low == user_id || self.high == user_id
    }

    /// The participant that is not `user_id`, if `user_id` is in the pair
    pub fn other(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.low {
            Some(self.high)
        } else if user_id == self.high {
            Some(self.low)
        } else {
            None
        }
    }

    /// Name of the live delivery channel shared by both participants
    pub fn channel_name(&self) -> String {
        format!("{}-{}", self.low, self.high)
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Durable conversation between exactly one pair of users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub pair: PairKey,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(pair: PairKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            pair,
            created_at: Utc::now(),
        }
    }

    pub fn channel_name(&self) -> String {
        self.pair.channel_name()
    }
}
