//! Row type for the `sessions` table.

use sqlx::FromRow;
use weatherapp_core::models::Session;
use weatherapp_core::types::{SessionId, Timestamp, UserId};

/// A session row. Only the SHA-256 digest of the refresh token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: SessionId,
    pub user_id: UserId,
    pub token_hash: String,
    pub created_at: Timestamp,
    pub refreshed_at: Timestamp,
    pub expires_at: Timestamp,
}

impl SessionRow {
    /// Rebuild the domain session. The plaintext token is not recoverable from
    /// the row, so the caller supplies the one it looked the row up with.
    pub fn into_session(self, token: String) -> Session {
        Session {
            id: self.id,
            user_id: self.user_id,
            token,
            created_at: self.created_at,
            refreshed_at: self.refreshed_at,
            expires_at: self.expires_at,
        }
    }
}
