//! Authentication context extraction
//!
//! Extracts the authenticated principal for a request by resolving the
//! `Authorization: Bearer` token against the identity service's session
//! table. Handlers that take an [`AuthContext`] argument are gated on an
//! unexpired session; no credential or cryptographic logic lives here.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};

use crate::auth;
use crate::error::ApiError;
use crate::server::EventDashServer;

/// Authenticated principal for the current request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub session_id: String,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<EventDashServer> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &EventDashServer,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::authentication("Missing or malformed Authorization header"))?;

        let principal = auth::find_principal(state.pool.pool(), token)
            .await?
            .ok_or_else(|| ApiError::authentication("Invalid or expired session"))?;

        Ok(AuthContext {
            user_id: principal.user_id,
            session_id: principal.session_id,
            email: principal.email,
        })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
