//! In-memory `ChatStore`
//!
//! Same semantics as the PostgreSQL store, including the uniqueness
//! conflict on `create_room` and store-assigned ordering. Data lives for
//! the lifetime of the process.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ChatStore, StoreError, StoreResult};
use crate::shared::messaging::{ChatMessage, NewMessage, PairKey, Room, UserSnapshot};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserSnapshot>,
    rooms: HashMap<Uuid, Room>,
    rooms_by_pair: HashMap<PairKey, Uuid>,
    /// Messages per room, kept in append order
    messages: HashMap<Uuid, Vec<ChatMessage>>,
    next_seq: i64,
    last_created_at: Option<DateTime<Utc>>,
}

/// Process-local store backed by hash maps
#[derive(Default)]
pub struct MemoryChatStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user
    ///
    /// Users are owned outside the chat core; this is how they get here.
    pub async fn insert_user(&self, user: UserSnapshot) {
        self.tables.write().await.users.insert(user.id, user);
    }

    /// Remove a user, leaving their rooms and messages in place
    pub async fn remove_user(&self, id: Uuid) -> Option<UserSnapshot> {
        self.tables.write().await.users.remove(&id)
    }

    /// Simulate an outage: while set, message appends fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored rooms
    pub async fn room_count(&self) -> usize {
        self.tables.read().await.rooms.len()
    }

    /// Number of stored messages across all rooms
    pub async fn message_count(&self) -> usize {
        self.tables.read().await.messages.values().map(Vec::len).sum()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserSnapshot>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<UserSnapshot>> {
        let tables = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| tables.users.get(id).cloned()).collect())
    }

    async fn find_room_by_pair(&self, pair: &PairKey) -> StoreResult<Option<Room>> {
        let tables = self.tables.read().await;
        Ok(tables
            .rooms_by_pair
            .get(pair)
            .and_then(|id| tables.rooms.get(id))
            .cloned())
    }

    async fn create_room(&self, pair: &PairKey) -> StoreResult<Room> {
        let mut tables = self.tables.write().await;
        if tables.rooms_by_pair.contains_key(pair) {
            return Err(StoreError::Conflict(*pair));
        }
        let room = Room::new(*pair);
        tables.rooms_by_pair.insert(*pair, room.id);
        tables.rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn list_rooms_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Room>> {
        let tables = self.tables.read().await;
        let mut rooms: Vec<Room> = tables
            .rooms
            .values()
            .filter(|room| room.pair.contains(user_id))
            .cloned()
            .collect();
        rooms.sort_by_key(|room| (room.created_at, room.id));
        Ok(rooms)
    }

    async fn append_message(&self, message: NewMessage) -> StoreResult<ChatMessage> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        if !tables.rooms.contains_key(&message.room_id) {
            return Err(StoreError::Corrupt(format!(
                "message references unknown room {}",
                message.room_id
            )));
        }

        tables.next_seq += 1;
        let seq = tables.next_seq;
        let now = Utc::now();
        // Strictly increasing at the precision PostgreSQL keeps
        let created_at = match tables.last_created_at {
            Some(last) if last >= now => last + Duration::microseconds(1),
            _ => now,
        };
        tables.last_created_at = Some(created_at);

        let stored = ChatMessage {
            id: Uuid::new_v4(),
            seq,
            room_id: message.room_id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            body: message.body,
            attachments: message.attachments,
            is_read: false,
            created_at,
        };
        tables
            .messages
            .entry(stored.room_id)
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn list_messages(&self, room_id: Uuid) -> StoreResult<Vec<ChatMessage>> {
        let tables = self.tables.read().await;
        let mut messages = tables.messages.get(&room_id).cloned().unwrap_or_default();
        messages.sort_by_key(ChatMessage::order_key);
        Ok(messages)
    }

    async fn last_message(&self, room_id: Uuid) -> StoreResult<Option<ChatMessage>> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .get(&room_id)
            .and_then(|messages| messages.iter().max_by_key(|m| m.order_key()))
            .cloned())
    }

    async fn count_unread(&self, room_id: Uuid, receiver_id: Uuid) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .messages
            .get(&room_id)
            .map(|messages| {
                messages
                    .iter()
                    .filter(|m| m.receiver_id == receiver_id && !m.is_read)
                    .count()
            })
            .unwrap_or(0);
        Ok(count as i64)
    }

    async fn list_unread(&self, room_id: Uuid, receiver_id: Uuid) -> StoreResult<Vec<ChatMessage>> {
        let tables = self.tables.read().await;
        let mut unread: Vec<ChatMessage> = tables
            .messages
            .get(&room_id)
            .map(|messages| {
                messages
                    .iter()
                    .filter(|m| m.receiver_id == receiver_id && !m.is_read)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        unread.sort_by_key(ChatMessage::order_key);
        Ok(unread)
    }

    async fn mark_read(&self, room_id: Uuid, receiver_id: Uuid) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        if let Some(messages) = tables.messages.get_mut(&room_id) {
            for message in messages
                .iter_mut()
                .filter(|m| m.receiver_id == receiver_id && !m.is_read)
            {
                message.is_read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }
}
