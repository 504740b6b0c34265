/**
 * Handshake Authentication
 *
 * Extracts the handshake credential from a request and runs it through the
 * configured `IdentityGate`. Used as an extractor on the socket route, so a
 * missing or rejected credential answers 401 before any upgrade happens.
 *
 * The credential is read from, in order:
 * 1. `Authorization: Bearer <token>` header
 * 2. `?token=<token>` query parameter (browsers cannot set headers on a
 *    WebSocket handshake)
 *
 * An empty bearer value counts as absent, so the query parameter still
 * applies.
 */

use axum::{
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, Uri},
};
use serde::Deserialize;

use crate::backend::auth::Identity;
use crate::backend::error::ChatError;
use crate::backend::server::state::AppState;

#[derive(Debug, Deserialize)]
struct HandshakeQuery {
    token: Option<String>,
}

/// Pull the raw credential out of headers or query string
pub fn extract_credential(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let from_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    from_header.or_else(|| {
        Query::<HandshakeQuery>::try_from_uri(uri)
            .ok()
            .and_then(|Query(q)| q.token)
            .filter(|token| !token.is_empty())
    })
}

/// Axum extractor for an authenticated connection identity
#[derive(Clone, Copy, Debug)]
pub struct AuthIdentity(pub Identity);

impl FromRequestParts<AppState> for AuthIdentity {
    type Rejection = ChatError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let credential = extract_credential(&parts.headers, &parts.uri).ok_or_else(|| {
            tracing::warn!("[Auth] Handshake without credential");
            ChatError::auth("Missing credential")
        })?;

        let identity = state.gate.authenticate(&credential).await?;
        Ok(AuthIdentity(identity))
    }
}
