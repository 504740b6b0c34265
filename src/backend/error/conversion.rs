/**
 * Error Conversion
 *
 * This module provides conversion implementations for chat errors:
 *
 * - `IntoResponse` for HTTP handlers (the handshake rejection path)
 * - `ServerEvent::Error` for socket replies
 * - `From` impls for store and shared errors
 *
 * # Response Format
 *
 * Error responses are returned as JSON with the following structure:
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 401
 * }
 * ```
 */

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::ChatError;
use crate::backend::store::StoreError;
use crate::shared::{ServerEvent, SharedError};

impl IntoResponse for ChatError {
    /// Convert a chat error into an HTTP response
    ///
    /// The response is a JSON object with:
    /// - `error`: The error message
    /// - `status`: The HTTP status code
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.message(),
            "status": status.as_u16(),
        });

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, header::HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<&ChatError> for ServerEvent {
    fn from(err: &ChatError) -> Self {
        ServerEvent::Error {
            kind: err.kind().to_string(),
            message: err.message(),
            retryable: err.is_retryable(),
        }
    }
}

impl From<ChatError> for ServerEvent {
    fn from(err: ChatError) -> Self {
        ServerEvent::from(&err)
    }
}

impl From<StoreError> for ChatError {
    fn from(err: StoreError) -> Self {
        ChatError::storage(err.to_string())
    }
}

impl From<SharedError> for ChatError {
    fn from(err: SharedError) -> Self {
        ChatError::validation(err.to_string())
    }
}
