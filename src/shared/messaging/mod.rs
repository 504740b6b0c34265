//! Messaging Module
//!
//! This module contains all the data structures for the chat system:
//!
//! - `UserSnapshot` - Read-only view of a user (role, subscription)
//! - `PairKey` / `Room` - The single conversation between two users
//! - `ChatMessage` - A stored message in a room
//! - `ConversationSummary` - Per-user view of one room
//!
//! # Usage
//!
//! ```rust
//! use xfchat::shared::messaging::{ChatMessage, ConversationSummary, PairKey, Room};
//! ```

pub mod user;
pub mod room;
pub mod message;
pub mod conversation;

// Re-export all types
pub use user::{ParticipantProfile, UserRole, UserSnapshot, UserStatus};
pub use room::{PairKey, Room};
pub use message::{ChatMessage, NewMessage};
pub use conversation::{sort_by_recency, ConversationSummary};
