/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The chat hub (store, presence registry, room resolver)
 * - The identity gate used on socket handshakes
 * - The loaded configuration
 *
 * Every field is cheap to clone and shared across handlers.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::{IdentityGate, JwtIdentityGate};
use crate::backend::chat::{ChatHub, MessageLimits};
use crate::backend::presence::PresenceRegistry;
use crate::backend::store::ChatStore;
use crate::shared::config::ChatConfig;

/// Application state shared by all handlers
///
/// # Usage
///
/// ```rust,no_run
/// use xfchat::backend::server::state::AppState;
/// use axum::extract::State;
///
/// async fn handler(State(app_state): State<AppState>) {
///     let online = app_state.hub.presence().online_user_ids().await;
///     // ...
/// }
/// ```
#[derive(Clone)]
pub struct AppState {
    /// Chat core: store, presence registry, resolver
    pub hub: ChatHub,

    /// Handshake authentication
    pub gate: Arc<dyn IdentityGate>,

    pub config: Arc<ChatConfig>,
}

impl AppState {
    /// Build state over a store, authenticating with JWTs signed by the
    /// configured secret
    pub fn new(store: Arc<dyn ChatStore>, config: ChatConfig) -> Self {
        let gate = Arc::new(JwtIdentityGate::new(config.jwt_secret.clone(), store.clone()));
        Self::with_gate(store, gate, config)
    }

    /// Build state with a custom identity gate
    pub fn with_gate(store: Arc<dyn ChatStore>, gate: Arc<dyn IdentityGate>, config: ChatConfig) -> Self {
        let hub = ChatHub::new(store, PresenceRegistry::new(), MessageLimits::from(&config));
        Self {
            hub,
            gate,
            config: Arc::new(config),
        }
    }
}

/// Implement FromRef for ChatHub
///
/// This allows Axum handlers to extract the hub directly using
/// `State(ChatHub)`.
impl FromRef<AppState> for ChatHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}

/// Implement FromRef for the identity gate
impl FromRef<AppState> for Arc<dyn IdentityGate> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.gate.clone()
    }
}

/// Implement FromRef for the presence registry
impl FromRef<AppState> for PresenceRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.presence().clone()
    }
}
