//! Shared Module
//!
//! Everything a socket client needs to talk to the server: the event frames,
//! the records they carry, and the errors raised while decoding them.
//! Nothing in here touches the store or the runtime.

/// Socket event protocol
pub mod event;

/// Decode and validation errors
pub mod error;

/// Chat server configuration
pub mod config;

/// Users, rooms, messages and conversation summaries
pub mod messaging;

pub use config::{ChatConfig, ChatConfigBuilder, ConfigError};
pub use error::SharedError;
pub use event::{ClientEvent, ServerEvent};
