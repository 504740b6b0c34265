/**
 * Identity Gate
 *
 * Turns a handshake credential into a verified identity. The socket route
 * calls the gate before upgrading; a rejected credential means the
 * connection is never established.
 *
 * `JwtIdentityGate` verifies the token, then re-reads the user from the
 * store: the user must exist and be `ACTIVE`. The returned role comes from
 * the store, not from the token.
 */

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use super::sessions::verify_token;
use crate::backend::error::{ChatError, ChatResult};
use crate::backend::store::ChatStore;
use crate::shared::messaging::{UserRole, UserStatus};

/// Verified identity of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Handshake authentication
#[async_trait]
pub trait IdentityGate: Send + Sync {
    /// Authenticate a credential, failing with `ChatError::Auth`
    async fn authenticate(&self, credential: &str) -> ChatResult<Identity>;
}

/// Gate accepting HS256 tokens issued by `sessions::create_token`
pub struct JwtIdentityGate {
    secret: String,
    store: Arc<dyn ChatStore>,
}

impl JwtIdentityGate {
    pub fn new(secret: impl Into<String>, store: Arc<dyn ChatStore>) -> Self {
        Self {
            secret: secret.into(),
            store,
        }
    }
}

#[async_trait]
impl IdentityGate for JwtIdentityGate {
    async fn authenticate(&self, credential: &str) -> ChatResult<Identity> {
        let claims = verify_token(&self.secret, credential).map_err(|e| {
            tracing::debug!("[Auth] Token rejected: {}", e);
            ChatError::auth("Invalid or expired token")
        })?;
        let user_id = claims
            .user_id()
            .map_err(|_| ChatError::auth("Invalid user ID in token"))?;

        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| ChatError::auth("User not found"))?;

        if user.status != UserStatus::Active {
            tracing::warn!(
                "[Auth] Refused handshake for user {} with status {}",
                user_id,
                user.status.as_str()
            );
            return Err(ChatError::auth("Account is not active"));
        }

        Ok(Identity {
            user_id,
            role: user.role,
        })
    }
}
