//! Chat Module
//!
//! The real-time conversation core. `ChatHub` composes the pieces and is
//! what the socket layer calls into:
//!
//! - **`policy`** - Access Policy: may these two users exchange messages?
//! - **`resolver`** - Room Resolver: the one room per unordered pair
//! - **`gateway`** - Message Gateway: policy → room → append → fan-out
//! - **`history`** - History & Unread Tracker: read-on-open, unread peek
//! - **`conversations`** - Conversation List Aggregator
//!
//! # Module Structure
//!
//! ```text
//! chat/
//! ├── mod.rs           - ChatHub and module exports
//! ├── policy.rs        - Access Policy
//! ├── locks.rs         - Per-key async locks
//! ├── resolver.rs      - Room Resolver
//! ├── gateway.rs       - Message Gateway
//! ├── history.rs       - History & Unread Tracker
//! └── conversations.rs - Conversation List Aggregator
//! ```
//!
//! # Consistency
//!
//! The store is the source of truth. Anything after a successful durable
//! write (channel fan-out, conversation pushes) is best-effort: failures
//! are logged and swallowed, and clients reconcile by fetching again.
//!
//! Appends to one room and their `message` emits happen under that room's
//! lock, so live delivery follows store order.

use std::sync::Arc;

use uuid::Uuid;

use crate::backend::error::{ChatError, ChatResult};
use crate::backend::presence::PresenceRegistry;
use crate::backend::store::ChatStore;
use crate::shared::config::ChatConfig;
use crate::shared::messaging::UserSnapshot;

/// Access Policy
pub mod policy;

/// Per-key async locks
pub mod locks;

/// Room Resolver
pub mod resolver;

/// Message Gateway
pub mod gateway;

/// History & Unread Tracker
pub mod history;

/// Conversation List Aggregator
pub mod conversations;

pub use history::HistoryOutcome;
pub use locks::KeyedLocks;
pub use policy::{can_exchange, AccessDecision, DenyReason};
pub use resolver::RoomResolver;

/// Limits applied to outgoing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLimits {
    pub max_message_length: usize,
    pub max_attachments: usize,
}

impl From<&ChatConfig> for MessageLimits {
    fn from(config: &ChatConfig) -> Self {
        Self {
            max_message_length: config.max_message_length,
            max_attachments: config.max_attachments,
        }
    }
}

impl Default for MessageLimits {
    fn default() -> Self {
        MessageLimits::from(&ChatConfig::default())
    }
}

/// Entry point for every chat operation
///
/// Cheap to clone; all clones share the same store, registry and resolver.
#[derive(Clone)]
pub struct ChatHub {
    store: Arc<dyn ChatStore>,
    presence: PresenceRegistry,
    resolver: Arc<RoomResolver>,
    room_locks: KeyedLocks<Uuid>,
    limits: MessageLimits,
}

impl ChatHub {
    pub fn new(store: Arc<dyn ChatStore>, presence: PresenceRegistry, limits: MessageLimits) -> Self {
        let resolver = Arc::new(RoomResolver::new(store.clone()));
        Self {
            store,
            presence,
            resolver,
            room_locks: KeyedLocks::new(),
            limits,
        }
    }

    pub fn store(&self) -> &Arc<dyn ChatStore> {
        &self.store
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    pub fn resolver(&self) -> &RoomResolver {
        &self.resolver
    }

    /// Per-room locks serializing append and emit
    pub(crate) fn room_locks(&self) -> &KeyedLocks<Uuid> {
        &self.room_locks
    }

    pub fn limits(&self) -> MessageLimits {
        self.limits
    }

    /// Load a user snapshot or fail with `NotFound("user")`
    pub(crate) async fn load_user(&self, id: Uuid) -> ChatResult<UserSnapshot> {
        self.store
            .find_user(id)
            .await?
            .ok_or_else(|| ChatError::not_found("user"))
    }
}
