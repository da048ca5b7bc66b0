//! Repository for the `sessions` table.
//!
//! Every read filters on `expires_at > NOW()`, so an expired session is
//! unreadable the moment its lifetime ends, whether or not it has been purged.

use sqlx::PgPool;
use weatherapp_core::models::Session;

use crate::models::session::SessionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token_hash, created_at, refreshed_at, expires_at";

/// Provides CRUD operations for refresh sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, storing `token_hash` in place of the token.
    pub async fn create(
        pool: &PgPool,
        session: &Session,
        token_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, token_hash, created_at, refreshed_at, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(token_hash)
        .bind(session.created_at)
        .bind(session.refreshed_at)
        .bind(session.expires_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Swap in a rotated token hash and timestamps, but only while the row
    /// still carries `previous_hash` and has not expired. Returns `true` if
    /// the row was updated.
    pub async fn rotate(
        pool: &PgPool,
        session: &Session,
        previous_hash: &str,
        token_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE sessions
             SET token_hash = $1, refreshed_at = $2, expires_at = $3
             WHERE id = $4
               AND token_hash = $5
               AND expires_at > NOW()",
        )
        .bind(token_hash)
        .bind(session.refreshed_at)
        .bind(session.expires_at)
        .bind(session.id)
        .bind(previous_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a live session by its token hash.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<SessionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE token_hash = $1
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Delete a live session by its token hash. Returns `true` if a row was deleted.
    pub async fn delete_by_token_hash(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM sessions WHERE token_hash = $1 AND expires_at > NOW()")
                .bind(token_hash)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete expired sessions. Returns the count of deleted rows.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
