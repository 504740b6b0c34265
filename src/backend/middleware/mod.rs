//! Request middleware
//!
//! Only handshake authentication lives here: `AuthIdentity` resolves the
//! caller before the socket route runs.

pub mod auth;

pub use auth::{extract_credential, AuthIdentity};
