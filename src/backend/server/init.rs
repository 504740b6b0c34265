/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server.
 *
 * # Initialization Process
 *
 * 1. Select the durable store (PostgreSQL, or in-memory when no database
 *    is configured)
 * 2. Build the application state (chat hub, presence registry, identity gate)
 * 3. Create and configure the router
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_store, StartupError};
use crate::backend::server::state::AppState;
use crate::backend::store::ChatStore;
use crate::shared::config::ChatConfig;

/// Create and configure the Axum application
///
/// # Arguments
///
/// * `config` - Loaded server configuration
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
///
/// # Errors
///
/// Fails when `DATABASE_URL` is set but the database cannot be reached or
/// migrated. Only an unset `DATABASE_URL` selects the in-memory store.
pub async fn create_app(config: ChatConfig) -> Result<Router<()>, StartupError> {
    tracing::info!("[Init] Initializing xfchat server");

    let store = load_store(&config).await?;
    let app = create_app_with_store(store, config);

    tracing::info!("[Init] Router configured");
    Ok(app)
}

/// Create the application over an existing store
pub fn create_app_with_store(store: Arc<dyn ChatStore>, config: ChatConfig) -> Router<()> {
    create_router(AppState::new(store, config))
}
