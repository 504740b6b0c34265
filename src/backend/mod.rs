//! Backend Module
//!
//! This module contains all server-side code for xfchat: the real-time
//! conversation core and the Axum server around it.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Server initialization, application state, store selection
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`realtime`** - WebSocket transport and event dispatch
//! - **`chat`** - Access policy, room resolver, message gateway, history,
//!   conversation aggregation
//! - **`presence`** - Presence registry of live connections
//! - **`store`** - Durable store trait with PostgreSQL and in-memory backends
//! - **`auth`** - JWT tokens and the identity gate
//! - **`middleware`** - Handshake authentication extractor
//! - **`error`** - Chat error taxonomy
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── realtime/       - WebSocket connections
//! ├── chat/           - Chat operations
//! ├── presence/       - Online users
//! ├── store/          - Persistence
//! ├── auth/           - Authentication
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Control Flow
//!
//! Handshake → identity gate → presence registration → per-event dispatch →
//! access policy → room resolver → store → channel fan-out → conversation
//! list push.
//!
//! # Thread Safety
//!
//! - The presence registry is a single lock-guarded table
//! - Room creation is serialized per pair and backed by a store uniqueness
//!   constraint
//! - The store is the only source of message order
//!
//! # Example
//!
//! ```rust,no_run
//! use xfchat::backend::create_app;
//! use xfchat::shared::ChatConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ChatConfig::default()).await?;
//! // Use app with axum::serve
//! # Ok(())
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// WebSocket transport
pub mod realtime;

/// Chat operations
pub mod chat;

/// Presence registry
pub mod presence;

/// Durable store
pub mod store;

/// Backend error types
pub mod error;

/// Authentication
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Re-export commonly used types
pub use chat::ChatHub;
pub use error::ChatError;
pub use presence::PresenceRegistry;
pub use server::create_app;
pub use store::{ChatStore, MemoryChatStore, PgChatStore};
