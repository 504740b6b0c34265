//! xfchat - Real-time Chat Server
//!
//! xfchat accepts authenticated WebSocket connections, tracks who is
//! online, keeps exactly one conversation per pair of users, routes
//! messages between them and maintains per-user conversation lists with
//! unread counts.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared with socket clients
//!   - Wire protocol (`ClientEvent`, `ServerEvent`)
//!   - Users, rooms, messages, conversation summaries
//!   - Configuration and shared error types
//!
//! - **`backend`** - Server-side code
//!   - Axum server and WebSocket transport
//!   - Presence registry, access policy, room resolver
//!   - Message gateway, history and conversation aggregation
//!   - PostgreSQL and in-memory stores
//!
//! # Usage
//!
//! ```rust,no_run
//! use xfchat::backend::server::init::create_app;
//! use xfchat::shared::ChatConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ChatConfig::from_env()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for decoding and validation
//! - `backend::error::ChatError` for every chat operation
//! - `backend::store::StoreError` for persistence

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
