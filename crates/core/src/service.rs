//! Credential and session orchestration: register, login, refresh, logout.
//!
//! [`AuthService`] holds no per-request mutable state. Every operation can run
//! concurrently for different callers; consistency comes from the stores.
//!
//! User and session writes are two independent store calls with no spanning
//! transaction. If the session insert fails after the user insert succeeded,
//! the user is left without a session; logging in again creates one.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::auth::jwt::TokenSigner;
use crate::auth::password::CredentialHasher;
use crate::auth::token::generate_session_token;
use crate::config::AuthConfig;
use crate::error::CoreError;
use crate::models::{Session, User};
use crate::store::{SessionStore, StoreError, UserStore};
use crate::types::{Timestamp, UserId};
use crate::validation::validate_credentials;

/// Access token plus refresh token returned by every successful flow.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub access_expires_at: Timestamp,
    pub refresh: String,
    pub refresh_expires_at: Timestamp,
}

/// The credential and session manager.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: CredentialHasher,
    signer: TokenSigner,
    session_duration: Duration,
    access_token_duration: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher: CredentialHasher::new(config.hash.clone()),
            signer: TokenSigner::new(config.token_secret.clone()),
            session_duration: config.session_duration,
            access_token_duration: config.access_token_duration,
        }
    }

    /// Create a user and open their first session.
    pub async fn register(&self, login: &str, password: &str) -> Result<TokenPair, CoreError> {
        validate_credentials(login, password)?;

        let password_hash = self.hasher.hash(password)?;
        let user = User::new(login, password_hash);

        self.users.insert(&user).await.map_err(|e| match e {
            StoreError::AlreadyExists { field: "login", .. } => {
                tracing::debug!(login, "Registration rejected: login taken");
                CoreError::UserAlreadyExists
            }
            other => internal("inserting user", other),
        })?;
        tracing::info!(user_id = %user.id, "User registered");

        self.open_session(user.id).await
    }

    /// Authenticate with login and password and open a new session.
    ///
    /// Unknown login and wrong password are indistinguishable to the caller,
    /// both in the error returned and in the work performed.
    pub async fn login(&self, login: &str, password: &str) -> Result<TokenPair, CoreError> {
        validate_credentials(login, password)?;

        let user = match self.users.find_by_login(login).await {
            Ok(user) => user,
            Err(e) => {
                if !matches!(e, StoreError::NotFound { .. }) {
                    tracing::warn!(error = %e, "User lookup failed during login");
                }
                self.hasher.verify_dummy(password);
                return Err(CoreError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
            return Err(CoreError::InvalidCredentials);
        }
        tracing::info!(user_id = %user.id, "User logged in");

        self.open_session(user.id).await
    }

    /// Exchange a refresh token for a new token pair, rotating the session.
    ///
    /// The presented token stops working as soon as the rotation is stored.
    /// Concurrent refreshes with the same token race on the store's
    /// conditional update; only the first one gets a pair.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<TokenPair, CoreError> {
        let mut session = self
            .sessions
            .find_by_token(refresh_token)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => CoreError::InvalidToken,
                other => internal("looking up session", other),
            })?;

        let now = Utc::now();
        session.rotate(generate_session_token(), now, self.session_duration);
        self.sessions
            .update(&session, refresh_token)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => CoreError::InvalidToken,
                other => internal("rotating session", other),
            })?;
        tracing::info!(session_id = %session.id, user_id = %session.user_id, "Session refreshed");

        self.token_pair(&session, now)
    }

    /// Terminate the session identified by `refresh_token`.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), CoreError> {
        self.sessions
            .delete_by_token(refresh_token)
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => CoreError::InvalidToken,
                other => internal("deleting session", other),
            })?;
        tracing::info!("Session terminated");
        Ok(())
    }

    /// Verify an access token and return its subject.
    pub fn authenticate(&self, access_token: &str) -> Result<UserId, CoreError> {
        let (user_id, _expires_at) = self.signer.verify(access_token)?;
        Ok(user_id)
    }

    /// Load the user an access token was issued to.
    pub async fn current_user(&self, user_id: UserId) -> Result<User, CoreError> {
        self.users.find_by_id(user_id).await.map_err(|e| match e {
            StoreError::NotFound { .. } => CoreError::InvalidToken,
            other => internal("looking up user", other),
        })
    }

    async fn open_session(&self, user_id: UserId) -> Result<TokenPair, CoreError> {
        let now = Utc::now();
        let session = Session::new(user_id, generate_session_token(), now, self.session_duration);

        self.sessions
            .insert(&session)
            .await
            .map_err(|e| internal("inserting session", e))?;
        tracing::debug!(session_id = %session.id, %user_id, "Session created");

        self.token_pair(&session, now)
    }

    fn token_pair(&self, session: &Session, now: Timestamp) -> Result<TokenPair, CoreError> {
        let access_expires_at = now + self.access_token_duration;
        let access = self.signer.sign(session.user_id, access_expires_at)?;

        Ok(TokenPair {
            access,
            access_expires_at,
            refresh: session.token.clone(),
            refresh_expires_at: session.expires_at,
        })
    }
}

/// Log a store failure and collapse it into [`CoreError::Internal`].
fn internal(action: &str, err: StoreError) -> CoreError {
    tracing::error!(error = %err, action, "Store operation failed");
    CoreError::Internal(format!("{action}: {err}"))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;
    use crate::config::HashConfig;
    use crate::store::memory::{InMemorySessionStore, InMemoryUserStore};

    fn test_config() -> AuthConfig {
        AuthConfig {
            session_duration: Duration::days(30),
            access_token_duration: Duration::minutes(15),
            token_secret: b"test-secret-that-is-long-enough-for-hmac".to_vec(),
            hash: HashConfig::fast_for_tests(),
        }
    }

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemorySessionStore::new()),
            &test_config(),
        )
    }

    /// A session store whose every call fails with a backend error.
    struct BrokenSessionStore;

    #[async_trait]
    impl SessionStore for BrokenSessionStore {
        async fn insert(&self, _: &Session) -> Result<(), StoreError> {
            Err(StoreError::Backend("connection refused".into()))
        }
        async fn find_by_token(&self, _: &str) -> Result<Session, StoreError> {
            Err(StoreError::Backend("connection refused".into()))
        }
        async fn update(&self, _: &Session, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend("connection refused".into()))
        }
        async fn delete_by_token(&self, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let svc = service();
        svc.register("alice", "password1").await.unwrap();

        let pair = svc.login("alice", "password1").await.unwrap();
        assert_eq!(svc.authenticate(&pair.access).unwrap(), svc.current_user_id("alice").await);
    }

    #[tokio::test]
    async fn test_unknown_login_runs_dummy_verification() {
        let svc = service();
        svc.register("alice", "password1").await.unwrap();

        svc.login("alice", "wrong-password").await.unwrap_err();
        assert!(
            !svc.hasher.dummy_hash_ready(),
            "a known login verifies against its own hash"
        );

        assert_matches!(
            svc.login("ghost", "password1").await,
            Err(CoreError::InvalidCredentials)
        );
        assert!(svc.hasher.dummy_hash_ready());
    }

    #[tokio::test]
    async fn test_refresh_rotates_token() {
        let svc = service();
        let first = svc.register("alice", "password1").await.unwrap();

        let second = svc.refresh_session(&first.refresh).await.unwrap();
        assert_ne!(second.refresh, first.refresh);
        assert!(second.refresh_expires_at >= first.refresh_expires_at);
        assert_matches!(
            svc.refresh_session(&first.refresh).await,
            Err(CoreError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn test_session_insert_failure_is_internal_and_leaves_user() {
        let users = Arc::new(InMemoryUserStore::new());
        let svc = AuthService::new(users.clone(), Arc::new(BrokenSessionStore), &test_config());

        assert_matches!(
            svc.register("orphan", "password1").await,
            Err(CoreError::Internal(_))
        );
        assert_eq!(users.len().await, 1, "user insert is not rolled back");
    }

    #[tokio::test]
    async fn test_refresh_store_failure_is_internal() {
        let svc = AuthService::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(BrokenSessionStore),
            &test_config(),
        );
        assert_matches!(
            svc.refresh_session("anything").await,
            Err(CoreError::Internal(_))
        );
        assert_matches!(svc.logout("anything").await, Err(CoreError::Internal(_)));
    }

    impl AuthService {
        async fn current_user_id(&self, login: &str) -> UserId {
            self.users.find_by_login(login).await.unwrap().id
        }
    }
}
