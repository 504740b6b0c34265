//! Route Configuration Module
//!
//! This module configures all HTTP routes for the chat server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! └── router.rs       - Main router creation
//! ```
//!
//! # Route Types
//!
//! - `GET /messages` - WebSocket upgrade; token via `Authorization: Bearer`
//!   or `?token=`. Rejected handshakes answer 401 and are never upgraded.
//! - `GET /health` - Liveness probe
//!
//! # Example
//!
//! ```rust,no_run
//! use xfchat::backend::routes::create_router;
//! use xfchat::backend::server::state::AppState;
//!
//! # fn example(app_state: AppState) {
//! let app = create_router(app_state);
//! # }
//! ```

/// Main router creation
pub mod router;

pub use router::create_router;
