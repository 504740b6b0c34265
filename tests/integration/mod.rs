//! Integration tests
//!
//! Chat operations against the in-memory store, the live WebSocket server,
//! and (ignored by default) the PostgreSQL store.

mod conversation_test;
mod socket_test;
