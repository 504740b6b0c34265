//! Real-time Module
//!
//! WebSocket transport for the chat core.
//!
//! # Architecture
//!
//! The realtime module is organized into focused submodules:
//!
//! - **`socket`** - Upgrade handler and per-connection read/write loops
//! - **`dispatch`** - Maps inbound events to chat operations and replies
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── socket.rs       - WebSocket connection handler
//! └── dispatch.rs     - Event dispatch
//! ```
//!
//! # Scheduling
//!
//! Every connection runs on its own task, so a slow store call on one
//! connection never stalls another. Within a connection, events are handled
//! in arrival order, which keeps a sender's messages in the order sent.
//! Outbound events go through an unbounded queue per connection, so
//! presence broadcasts never wait on a slow socket.

/// WebSocket connection handler
pub mod socket;

/// Event dispatch
pub mod dispatch;

pub use dispatch::{dispatch, dispatch_text};
pub use socket::{handle_socket_upgrade, run_connection};
