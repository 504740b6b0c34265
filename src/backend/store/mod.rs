//! Durable Store
//!
//! The chat core reads users and reads/writes rooms and messages through the
//! `ChatStore` trait. Two implementations ship with the server:
//!
//! - **`PgChatStore`** - PostgreSQL via sqlx, used when `DATABASE_URL` is set
//! - **`MemoryChatStore`** - in-process tables, used otherwise and in tests
//!
//! # Uniqueness
//!
//! `create_room` must fail with `StoreError::Conflict` when a room for the
//! pair already exists. The room resolver relies on this to recover from a
//! creation race it could not serialize itself (another resolver sharing the
//! same store).
//!
//! # Ordering
//!
//! `list_messages` returns messages by `created_at` ascending, ties broken by
//! the insertion sequence the store assigns in `append_message`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::messaging::{ChatMessage, NewMessage, PairKey, Room, UserSnapshot};

/// In-memory store
pub mod memory;

/// PostgreSQL store
pub mod postgres;

pub use memory::MemoryChatStore;
pub use postgres::PgChatStore;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by a `ChatStore`
#[derive(Debug, Error)]
pub enum StoreError {
    /// A room for this pair already exists
    #[error("room already exists for pair {0}")]
    Conflict(PairKey),

    /// A stored row could not be mapped back to a domain type
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

/// Persistence contract consumed by the chat core
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Load a user snapshot
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserSnapshot>>;

    /// Load several user snapshots; unknown ids are skipped
    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<UserSnapshot>>;

    /// Look up the room for a pair
    async fn find_room_by_pair(&self, pair: &PairKey) -> StoreResult<Option<Room>>;

    /// Create the room for a pair, or fail with `StoreError::Conflict`
    async fn create_room(&self, pair: &PairKey) -> StoreResult<Room>;

    /// All rooms the user participates in
    async fn list_rooms_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Room>>;

    /// Durably append a message and assign its `seq` and `created_at`
    async fn append_message(&self, message: NewMessage) -> StoreResult<ChatMessage>;

    /// Messages of a room, oldest first
    async fn list_messages(&self, room_id: Uuid) -> StoreResult<Vec<ChatMessage>>;

    /// Most recent message of a room
    async fn last_message(&self, room_id: Uuid) -> StoreResult<Option<ChatMessage>>;

    /// Number of unread messages addressed to `receiver_id` in a room
    async fn count_unread(&self, room_id: Uuid, receiver_id: Uuid) -> StoreResult<i64>;

    /// Unread messages addressed to `receiver_id` in a room, oldest first
    async fn list_unread(&self, room_id: Uuid, receiver_id: Uuid) -> StoreResult<Vec<ChatMessage>>;

    /// Mark every unread message addressed to `receiver_id` in a room as read.
    /// Returns how many messages changed.
    async fn mark_read(&self, room_id: Uuid, receiver_id: Uuid) -> StoreResult<u64>;
}
