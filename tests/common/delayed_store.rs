//! Store wrapper with injected latency
//!
//! Commits through an inner `MemoryChatStore` immediately, then holds the
//! reply back. Used to widen race windows deterministically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use uuid::Uuid;
use xfchat::backend::store::{ChatStore, MemoryChatStore, StoreResult};
use xfchat::shared::messaging::{ChatMessage, NewMessage, PairKey, Room, UserSnapshot};

pub struct DelayedStore {
    pub inner: Arc<MemoryChatStore>,
    first_append_delay: Duration,
    create_room_delay: Duration,
    first_append_seen: AtomicBool,
}

impl DelayedStore {
    pub fn new(inner: Arc<MemoryChatStore>) -> Self {
        Self {
            inner,
            first_append_delay: Duration::ZERO,
            create_room_delay: Duration::ZERO,
            first_append_seen: AtomicBool::new(false),
        }
    }

    /// Reply to the first append only after `delay`
    pub fn slow_first_append(mut self, delay: Duration) -> Self {
        self.first_append_delay = delay;
        self
    }

    /// Wait `delay` before creating a room
    pub fn slow_create_room(mut self, delay: Duration) -> Self {
        self.create_room_delay = delay;
        self
    }
}

#[async_trait]
impl ChatStore for DelayedStore {
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<UserSnapshot>> {
        self.inner.find_user(id).await
    }

    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<UserSnapshot>> {
        self.inner.find_users(ids).await
    }

    async fn find_room_by_pair(&self, pair: &PairKey) -> StoreResult<Option<Room>> {
        self.inner.find_room_by_pair(pair).await
    }

    async fn create_room(&self, pair: &PairKey) -> StoreResult<Room> {
        sleep(self.create_room_delay).await;
        self.inner.create_room(pair).await
    }

    async fn list_rooms_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Room>> {
        self.inner.list_rooms_for_user(user_id).await
    }

    async fn append_message(&self, message: NewMessage) -> StoreResult<ChatMessage> {
        let stored = self.inner.append_message(message).await?;
        if !self.first_append_seen.swap(true, Ordering::SeqCst) {
            sleep(self.first_append_delay).await;
        }
        Ok(stored)
    }

    async fn list_messages(&self, room_id: Uuid) -> StoreResult<Vec<ChatMessage>> {
        self.inner.list_messages(room_id).await
    }

    async fn last_message(&self, room_id: Uuid) -> StoreResult<Option<ChatMessage>> {
        self.inner.last_message(room_id).await
    }

    async fn count_unread(&self, room_id: Uuid, receiver_id: Uuid) -> StoreResult<i64> {
        self.inner.count_unread(room_id, receiver_id).await
    }

    async fn list_unread(&self, room_id: Uuid, receiver_id: Uuid) -> StoreResult<Vec<ChatMessage>> {
        self.inner.list_unread(room_id, receiver_id).await
    }

    async fn mark_read(&self, room_id: Uuid, receiver_id: Uuid) -> StoreResult<u64> {
        self.inner.mark_read(room_id, receiver_id).await
    }
}
