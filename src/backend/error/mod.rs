//! Backend Error Module
//!
//! This module defines the error taxonomy of the chat server. Every chat
//! operation returns `ChatError`; the socket layer turns it into an `error`
//! event for the originating connection, and HTTP handlers return it
//! directly.
//!
//! # Architecture
//!
//! The error module is organized into focused submodules:
//!
//! - **`types`** - Error type definitions and constructors
//! - **`conversion`** - Error conversion implementations (IntoResponse, events)
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - Error conversion implementations
//! ```
//!
//! # Error Types
//!
//! - `Auth` - Handshake rejected; the connection is never established
//! - `Validation` - Missing or malformed input; no state change
//! - `PolicyDenied` - Access policy refused the exchange; no state change
//! - `NotFound` - Referenced user or conversation does not exist
//! - `Storage` - Durable store failed; retryable
//!
//! # Example
//!
//! ```rust
//! use xfchat::backend::error::ChatError;
//!
//! let err = ChatError::validation("receiver_id is required");
//! assert_eq!(err.kind(), "validation");
//! assert!(!err.is_retryable());
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{ChatError, ChatResult};
