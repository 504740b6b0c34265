/**
 * Chat Error Types
 *
 * This module defines the error taxonomy shared by every chat operation.
 *
 * # Error Categories
 *
 * ## Caller errors
 *
 * Reported to the originating connection only, never broadcast:
 * - Rejected handshake credential
 * - Missing required field (receiver id, body)
 * - Access policy denial (self-message, subscription required)
 * - Unknown user or conversation
 *
 * ## Storage errors
 *
 * The durable store is unavailable or a write failed. These are the only
 * retryable errors. Steps already committed before the failure stay
 * committed.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::chat::policy::DenyReason;

/// Result alias used throughout the chat backend
pub type ChatResult<T> = Result<T, ChatError>;

/// Chat error taxonomy
///
/// # Usage
///
/// ```rust
/// use xfchat::backend::error::ChatError;
///
/// let err = ChatError::not_found("user");
/// assert_eq!(err.kind(), "not_found");
///
/// let err = ChatError::storage("connection reset");
/// assert!(err.is_retryable());
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Handshake credential missing, invalid, or for an inactive user
    #[error("Authentication failed: {message}")]
    Auth {
        /// Human-readable error message
        message: String,
    },

    /// Missing or malformed input
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message
        message: String,
    },

    /// The access policy refused the exchange
    #[error("Policy denied: {0}")]
    PolicyDenied(DenyReason),

    /// A referenced entity does not exist
    #[error("Not found: {what}")]
    NotFound {
        /// What was looked up ("user", "conversation")
        what: String,
    },

    /// The durable store failed
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable error message
        message: String,
    },
}

impl ChatError {
    /// Create a new authentication error
    ///
    /// # Arguments
    ///
    /// * `message` - Error message
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a new validation error
    ///
    /// # Arguments
    ///
    /// * `message` - Error message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    ///
    /// # Arguments
    ///
    /// * `what` - The kind of entity that was not found
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a new storage error
    ///
    /// # Arguments
    ///
    /// * `message` - Error message
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Stable machine-readable kind, sent as `error.kind` on the socket
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "auth",
            Self::Validation { .. } => "validation",
            Self::PolicyDenied(_) => "policy_denied",
            Self::NotFound { .. } => "not_found",
            Self::Storage { .. } => "storage",
        }
    }

    /// Only storage failures are worth retrying unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Auth` - 401 Unauthorized
    /// - `Validation` - 400 Bad Request
    /// - `PolicyDenied` - 403 Forbidden
    /// - `NotFound` - 404 Not Found
    /// - `Storage` - 503 Service Unavailable
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth { .. } => StatusCode::UNAUTHORIZED,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::PolicyDenied(_) => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Storage { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get the error message
    ///
    /// # Returns
    ///
    /// A human-readable error message without the category prefix
    pub fn message(&self) -> String {
        match self {
            Self::Auth { message } => message.clone(),
            Self::Validation { message } => message.clone(),
            Self::PolicyDenied(reason) => reason.to_string(),
            Self::NotFound { what } => format!("{} not found", what),
            Self::Storage { message } => message.clone(),
        }
    }
}
