//! Production [`UserStore`] and [`SessionStore`] backed by PostgreSQL.

use async_trait::async_trait;
use weatherapp_core::auth::token::hash_session_token;
use weatherapp_core::models::{Session, User};
use weatherapp_core::store::{SessionStore, StoreError, UserStore};
use weatherapp_core::types::UserId;

use crate::error::classify;
use crate::repositories::{SessionRepo, UserRepo};
use crate::DbPool;

/// Users in the `users` table. Login uniqueness is enforced by `uq_users_login`.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        UserRepo::create(&self.pool, user.id, &user.login, &user.password_hash)
            .await
            .map_err(|e| classify(e, "user"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, StoreError> {
        UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(|e| classify(e, "user"))?
            .map(User::from)
            .ok_or(StoreError::NotFound {
                entity: "user",
                field: "id",
            })
    }

    async fn find_by_login(&self, login: &str) -> Result<User, StoreError> {
        UserRepo::find_by_login(&self.pool, login)
            .await
            .map_err(|e| classify(e, "user"))?
            .map(User::from)
            .ok_or(StoreError::NotFound {
                entity: "user",
                field: "login",
            })
    }
}

/// Sessions in the `sessions` table, keyed by id and by token digest.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Remove sessions whose lifetime has ended. Returns the number removed.
    pub async fn purge_expired(&self) -> Result<u64, StoreError> {
        let deleted = SessionRepo::delete_expired(&self.pool)
            .await
            .map_err(|e| classify(e, "session"))?;
        tracing::debug!(deleted, "Deleted expired session rows");
        Ok(deleted)
    }
}

fn session_not_found() -> StoreError {
    StoreError::NotFound {
        entity: "session",
        field: "token",
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn insert(&self, session: &Session) -> Result<(), StoreError> {
        SessionRepo::create(&self.pool, session, &hash_session_token(&session.token))
            .await
            .map_err(|e| classify(e, "session"))
    }

    async fn find_by_token(&self, token: &str) -> Result<Session, StoreError> {
        SessionRepo::find_by_token_hash(&self.pool, &hash_session_token(token))
            .await
            .map_err(|e| classify(e, "session"))?
            .map(|row| row.into_session(token.to_string()))
            .ok_or_else(session_not_found)
    }

    async fn update(&self, session: &Session, previous_token: &str) -> Result<(), StoreError> {
        let rotated = SessionRepo::rotate(
            &self.pool,
            session,
            &hash_session_token(previous_token),
            &hash_session_token(&session.token),
        )
        .await
        .map_err(|e| classify(e, "session"))?;
        if rotated {
            Ok(())
        } else {
            Err(session_not_found())
        }
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), StoreError> {
        let deleted = SessionRepo::delete_by_token_hash(&self.pool, &hash_session_token(token))
            .await
            .map_err(|e| classify(e, "session"))?;
        if deleted {
            Ok(())
        } else {
            Err(session_not_found())
        }
    }
}
