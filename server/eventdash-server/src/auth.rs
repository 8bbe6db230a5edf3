//! Session-capability lookups
//!
//! Credential handling, session issuance and passkey ceremonies are owned by
//! the external identity service; this module only answers "is there an
//! authenticated principal for this token" by reading the identity service's
//! session table.

use event_store::{StoreError, StoreResult};
use sqlx::PgPool;

/// Authenticated principal resolved from a session token.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Principal {
    pub session_id: String,
    pub user_id: String,
    pub email: String,
}

/// Resolve a bearer token to a principal, if an unexpired session exists.
pub async fn find_principal(pool: &PgPool, token: &str) -> StoreResult<Option<Principal>> {
    let principal = sqlx::query_as::<_, Principal>(
        r#"
        SELECT s.id AS session_id, s.user_id, u.email
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token = $1 AND s.expires_at > now()
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await
    .map_err(StoreError::from)?;

    Ok(principal)
}
