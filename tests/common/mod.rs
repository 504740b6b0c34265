//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - User and chat hub fixtures over the in-memory store
//! - A store wrapper that delays selected replies
//! - A live server on a loopback port with a WebSocket client
//! - PostgreSQL fixtures for the ignored database tests
//! - Custom assertion macros

#![allow(dead_code)]

pub mod database;
pub mod delayed_store;
pub mod server;

// Re-export commonly used utilities
pub use database::*;
pub use delayed_store::*;
pub use fixtures::*;
pub use server::*;
