//! Storage contracts consumed by [`crate::service::AuthService`].
//!
//! Each contract has one production implementation (PostgreSQL, in the `db`
//! crate) and an in-memory double in [`memory`] for tests.

pub mod memory;

use async_trait::async_trait;

use crate::models::{Session, User};
use crate::types::UserId;

/// Failure reported by a store.
///
/// Stores classify what they can recognise; everything else is `Backend`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} already exists with the provided {field}")]
    AlreadyExists {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity} not found by {field}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Durable storage of user identity records.
///
/// Implementations must enforce `login` uniqueness atomically: of two
/// concurrent inserts with the same login exactly one succeeds and the other
/// gets [`StoreError::AlreadyExists`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &User) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<User, StoreError>;

    async fn find_by_login(&self, login: &str) -> Result<User, StoreError>;
}

/// Durable, expiring storage of refresh sessions.
///
/// A session is reachable by id and by token. Both paths are written together:
/// a half-written session must never be observable. Once `expires_at` passes
/// the session must become unreadable without any action from the caller.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: &Session) -> Result<(), StoreError>;

    async fn find_by_token(&self, token: &str) -> Result<Session, StoreError>;

    /// Persist a rotated session. Equivalent to re-inserting it with its new
    /// token and expiry; the previous token stops resolving.
    ///
    /// The write only applies while `previous_token` is still the session's
    /// live token. Otherwise it fails with [`StoreError::NotFound`], so of two
    /// concurrent rotations from the same token exactly one succeeds.
    async fn update(&self, session: &Session, previous_token: &str) -> Result<(), StoreError>;

    async fn delete_by_token(&self, token: &str) -> Result<(), StoreError>;
}
