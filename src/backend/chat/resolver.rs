/**
 * Room Resolver
 *
 * Finds or creates the single room for an unordered pair of users.
 *
 * # Concurrency
 *
 * Two first messages between the same pair can race. Creation is guarded
 * twice:
 *
 * 1. Within this process, creators of the same pair serialize on a per-pair
 *    async lock and re-check the store after acquiring it, so the loser
 *    returns the winner's room.
 * 2. Across resolvers sharing one store, the store's uniqueness constraint
 *    rejects the second insert with `StoreError::Conflict`; the resolver
 *    then re-fetches and returns the existing row.
 *
 * Pair locks are dropped from the table as soon as no task holds or waits
 * on them, including tasks cancelled mid-resolve.
 */

use std::sync::Arc;

use uuid::Uuid;

use super::locks::KeyedLocks;
use crate::backend::error::{ChatError, ChatResult};
use crate::backend::store::{ChatStore, StoreError};
use crate::shared::messaging::{PairKey, Room};

pub struct RoomResolver {
    store: Arc<dyn ChatStore>,
    locks: KeyedLocks<PairKey>,
}

impl RoomResolver {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self {
            store,
            locks: KeyedLocks::new(),
        }
    }

    /// Look up the room for a pair without creating it
    pub async fn find(&self, a: Uuid, b: Uuid) -> ChatResult<Option<Room>> {
        let pair = PairKey::new(a, b)?;
        Ok(self.store.find_room_by_pair(&pair).await?)
    }

    /// Return the room for `{a, b}`, creating it if this is first contact
    pub async fn resolve_or_create(&self, a: Uuid, b: Uuid) -> ChatResult<Room> {
        let pair = PairKey::new(a, b)?;

        if let Some(room) = self.store.find_room_by_pair(&pair).await? {
            return Ok(room);
        }

        let _guard = self.locks.lock(pair).await;
        self.find_or_create(&pair).await
    }

    /// Number of pair locks currently tracked
    pub fn tracked_locks(&self) -> usize {
        self.locks.len()
    }

    async fn find_or_create(&self, pair: &PairKey) -> ChatResult<Room> {
        if let Some(room) = self.store.find_room_by_pair(pair).await? {
            return Ok(room);
        }

        match self.store.create_room(pair).await {
            Ok(room) => {
                tracing::info!("[Resolver] Created room {} for pair {}", room.id, pair);
                Ok(room)
            }
            Err(StoreError::Conflict(_)) => {
                tracing::debug!("[Resolver] Lost creation race for pair {}, re-fetching", pair);
                self.store
                    .find_room_by_pair(pair)
                    .await?
                    .ok_or_else(|| ChatError::storage(format!("room for pair {} vanished after conflict", pair)))
            }
            Err(e) => {
                tracing::error!("[Resolver] Failed to create room for pair {}: {}", pair, e);
                Err(e.into())
            }
        }
    }
}
