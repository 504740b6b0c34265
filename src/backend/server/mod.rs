//! Server Module
//!
//! Wiring between configuration, store and router:
//!
//! - **`config`** - picks PostgreSQL or the in-memory store
//! - **`state`** - `AppState` shared by handlers
//! - **`init`** - builds the router for `axum::serve`
//!
//! ```rust,no_run
//! use xfchat::backend::server::create_app;
//! use xfchat::shared::ChatConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ChatConfig::from_env()?).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod init;
pub mod state;

pub use config::StartupError;
pub use init::{create_app, create_app_with_store};
pub use state::AppState;
