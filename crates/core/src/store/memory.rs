//! In-memory store doubles.
//!
//! Each store keeps its indexes behind a single mutex so multi-index writes are
//! atomic, mirroring the guarantees of the production stores.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{SessionStore, StoreError, UserStore};
use crate::models::{Session, User};
use crate::types::{SessionId, UserId};

#[derive(Default)]
struct UserIndex {
    by_id: HashMap<UserId, User>,
    id_by_login: HashMap<String, UserId>,
}

/// [`UserStore`] backed by two hash maps.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: Mutex<UserIndex>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: &User) -> Result<(), StoreError> {
        let mut index = self.inner.lock().await;
        if index.id_by_login.contains_key(&user.login) {
            return Err(StoreError::AlreadyExists {
                entity: "user",
                field: "login",
            });
        }
        if index.by_id.contains_key(&user.id) {
            return Err(StoreError::AlreadyExists {
                entity: "user",
                field: "id",
            });
        }
        index.id_by_login.insert(user.login.clone(), user.id);
        index.by_id.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, StoreError> {
        self.inner
            .lock()
            .await
            .by_id
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "user",
                field: "id",
            })
    }

    async fn find_by_login(&self, login: &str) -> Result<User, StoreError> {
        let index = self.inner.lock().await;
        index
            .id_by_login
            .get(login)
            .and_then(|id| index.by_id.get(id))
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "user",
                field: "login",
            })
    }
}

#[derive(Default)]
struct SessionIndex {
    by_id: HashMap<SessionId, Session>,
    id_by_token: HashMap<String, SessionId>,
}

impl SessionIndex {
    fn remove(&mut self, id: SessionId) {
        if let Some(old) = self.by_id.remove(&id) {
            self.id_by_token.remove(&old.token);
        }
    }

    fn put(&mut self, session: &Session) {
        self.remove(session.id);
        self.id_by_token.insert(session.token.clone(), session.id);
        self.by_id.insert(session.id, session.clone());
    }
}

/// [`SessionStore`] with time-to-live semantics.
///
/// Expired sessions are treated as absent on every read and evicted lazily.
#[derive(Default)]
pub struct InMemorySessionStore {
    inner: Mutex<SessionIndex>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn session_not_found() -> StoreError {
    StoreError::NotFound {
        entity: "session",
        field: "token",
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: &Session) -> Result<(), StoreError> {
        if session.is_expired_at(Utc::now()) {
            // Zero time-to-live: the write is accepted and immediately gone.
            return Ok(());
        }
        let mut index = self.inner.lock().await;
        if index.id_by_token.contains_key(&session.token) {
            return Err(StoreError::AlreadyExists {
                entity: "session",
                field: "token",
            });
        }
        index.put(session);
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Session, StoreError> {
        let mut index = self.inner.lock().await;
        let id = *index.id_by_token.get(token).ok_or_else(session_not_found)?;
        let session = index.by_id.get(&id).cloned().ok_or_else(session_not_found)?;

        if session.is_expired_at(Utc::now()) {
            index.remove(id);
            return Err(session_not_found());
        }
        Ok(session)
    }

    async fn update(&self, session: &Session, previous_token: &str) -> Result<(), StoreError> {
        let mut index = self.inner.lock().await;
        let now = Utc::now();
        let current = index
            .id_by_token
            .get(previous_token)
            .and_then(|id| index.by_id.get(id));
        match current {
            Some(stored) if stored.id == session.id && !stored.is_expired_at(now) => {}
            _ => return Err(session_not_found()),
        }
        if session.is_expired_at(now) {
            index.remove(session.id);
            return Ok(());
        }
        if let Some(owner) = index.id_by_token.get(&session.token) {
            if *owner != session.id {
                return Err(StoreError::AlreadyExists {
                    entity: "session",
                    field: "token",
                });
            }
        }
        index.put(session);
        Ok(())
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), StoreError> {
        let mut index = self.inner.lock().await;
        let id = *index.id_by_token.get(token).ok_or_else(session_not_found)?;
        let expired = index
            .by_id
            .get(&id)
            .map_or(true, |s| s.is_expired_at(Utc::now()));
        index.remove(id);
        if expired {
            return Err(session_not_found());
        }
        Ok(())
    }
}
