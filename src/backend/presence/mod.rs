//! Presence Registry
//!
//! Process-wide table of online users and their live connection. It is the
//! only owner of that table: every mutation goes through `register`,
//! `unregister` or `release`, each of which broadcasts the change while
//! still holding the lock, so no connection observes a presence event out
//! of order with the online set it describes.
//!
//! # Policy
//!
//! - One live connection per user. Registering again replaces the previous
//!   entry; the superseded connection is told `sessionReplaced` and its
//!   writer closes the socket.
//! - `unregister` is idempotent.
//! - `release` is the disconnect path and only removes the entry if it still
//!   belongs to the disconnecting connection.
//!
//! # Channels
//!
//! A channel is a named group of connections (the canonical pair name of a
//! room). Channel membership is tied to the connection and disappears with
//! it.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use crate::shared::ServerEvent;

/// Outbound side of one live socket
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: Uuid,
    user_id: Uuid,
    outbound: mpsc::UnboundedSender<ServerEvent>,
}

impl ConnectionHandle {
    /// Create a handle and the receiver its writer task drains
    pub fn new(user_id: Uuid) -> (Self, mpsc::UnboundedReceiver<ServerEvent>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let handle = Self {
            id: Uuid::new_v4(),
            user_id,
            outbound,
        };
        (handle, rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Queue an event; false if the socket's writer has gone away
    pub fn send(&self, event: ServerEvent) -> bool {
        self.outbound.send(event).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

struct Entry {
    handle: ConnectionHandle,
    channels: HashSet<String>,
}

/// Lock-guarded table of live connections
#[derive(Clone, Default)]
pub struct PresenceRegistry {
    entries: Arc<Mutex<HashMap<Uuid, Entry>>>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection for its user
    ///
    /// # Returns
    ///
    /// The connection this one superseded, if the user was already online.
    pub async fn register(&self, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        let user_id = handle.user_id();
        let mut entries = self.entries.lock().await;

        let previous = entries
            .insert(
                user_id,
                Entry {
                    handle,
                    channels: HashSet::new(),
                },
            )
            .map(|entry| entry.handle);

        if let Some(previous) = &previous {
            tracing::info!(
                "[Presence] User {} reconnected, superseding connection {}",
                user_id,
                previous.id()
            );
            previous.send(ServerEvent::SessionReplaced);
        } else {
            tracing::info!("[Presence] User {} is online", user_id);
        }

        Self::broadcast_change(&entries, user_id, true);
        previous
    }

    /// Remove a user unconditionally
    ///
    /// Returns false, and broadcasts nothing, if the user was not online.
    pub async fn unregister(&self, user_id: Uuid) -> bool {
        let mut entries = self.entries.lock().await;
        if entries.remove(&user_id).is_none() {
            return false;
        }
        tracing::info!("[Presence] User {} is offline", user_id);
        Self::broadcast_change(&entries, user_id, false);
        true
    }

    /// Remove a user only if `connection_id` is still their live connection
    pub async fn release(&self, user_id: Uuid, connection_id: Uuid) -> bool {
        let mut entries = self.entries.lock().await;
        match entries.get(&user_id) {
            Some(entry) if entry.handle.id() == connection_id => {}
            Some(_) => {
                tracing::debug!(
                    "[Presence] Stale connection {} of user {} closed, keeping newer one",
                    connection_id,
                    user_id
                );
                return false;
            }
            None => return false,
        }
        entries.remove(&user_id);
        tracing::info!("[Presence] User {} disconnected", user_id);
        Self::broadcast_change(&entries, user_id, false);
        true
    }

    pub async fn is_online(&self, user_id: Uuid) -> bool {
        self.entries.lock().await.contains_key(&user_id)
    }

    /// The user's live connection, if any
    pub async fn connection_for(&self, user_id: Uuid) -> Option<ConnectionHandle> {
        self.entries
            .lock()
            .await
            .get(&user_id)
            .map(|entry| entry.handle.clone())
    }

    pub async fn online_user_ids(&self) -> BTreeSet<Uuid> {
        self.entries.lock().await.keys().copied().collect()
    }

    /// Add the user's live connection to a channel
    ///
    /// Returns false if the user is offline.
    pub async fn join(&self, user_id: Uuid, channel: &str) -> bool {
        match self.entries.lock().await.get_mut(&user_id) {
            Some(entry) => {
                entry.channels.insert(channel.to_string());
                true
            }
            None => false,
        }
    }

    /// Deliver an event to every connection in a channel
    ///
    /// # Returns
    ///
    /// Number of connections the event was queued on
    pub async fn emit_to_channel(&self, channel: &str, event: &ServerEvent) -> usize {
        let entries = self.entries.lock().await;
        let mut delivered = 0;
        for entry in entries.values().filter(|e| e.channels.contains(channel)) {
            if entry.handle.send(event.clone()) {
                delivered += 1;
            } else {
                tracing::warn!(
                    "[Presence] Dropped event for user {}: writer closed",
                    entry.handle.user_id()
                );
            }
        }
        delivered
    }

    /// Deliver an event to one user's live connection
    pub async fn send_to(&self, user_id: Uuid, event: ServerEvent) -> bool {
        match self.entries.lock().await.get(&user_id) {
            Some(entry) => entry.handle.send(event),
            None => false,
        }
    }

    fn broadcast_change(entries: &HashMap<Uuid, Entry>, user_id: Uuid, is_online: bool) {
        let mut online: Vec<Uuid> = entries.keys().copied().collect();
        online.sort();
        let status = ServerEvent::UserStatus { user_id, is_online };
        let snapshot = ServerEvent::OnlineUsers(online);

        for entry in entries.values() {
            if !(entry.handle.send(status.clone()) && entry.handle.send(snapshot.clone())) {
                tracing::warn!(
                    "[Presence] Could not notify user {} of presence change",
                    entry.handle.user_id()
                );
            }
        }
    }
}
