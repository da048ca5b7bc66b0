//! Refresh-session record.
//!
//! A session moves through `Created -> (Refreshed)* -> Expired`. Refreshing
//! rotates the token and timestamps in place; expiry is purely a wall-clock
//! comparison against `expires_at`, enforced by the session store.

use chrono::Duration;

use crate::types::{SessionId, Timestamp, UserId};

/// A refresh session owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    /// Opaque refresh credential presented by the client.
    pub token: String,
    pub created_at: Timestamp,
    pub refreshed_at: Timestamp,
    /// Always `refreshed_at + session duration`.
    pub expires_at: Timestamp,
}

impl Session {
    /// Start a new session at `now`.
    pub fn new(user_id: UserId, token: String, now: Timestamp, duration: Duration) -> Self {
        Self {
            id: SessionId::now_v7(),
            user_id,
            token,
            created_at: now,
            refreshed_at: now,
            expires_at: now + duration,
        }
    }

    /// Replace the token and push expiry out, keeping `id` and `user_id`.
    pub fn rotate(&mut self, token: String, now: Timestamp, duration: Duration) {
        self.token = token;
        self.refreshed_at = now;
        self.expires_at = now + duration;
    }

    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    /// Time left until expiry, or `None` if the session has already expired.
    pub fn time_to_live(&self, now: Timestamp) -> Option<Duration> {
        let remaining = self.expires_at - now;
        (remaining > Duration::zero()).then_some(remaining)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_rotate_preserves_identity() {
        let now = Utc::now();
        let mut session = Session::new(UserId::now_v7(), "old".into(), now, Duration::hours(1));
        let (id, user_id, created_at) = (session.id, session.user_id, session.created_at);

        let later = now + Duration::minutes(10);
        session.rotate("new".into(), later, Duration::hours(1));

        assert_eq!(session.id, id);
        assert_eq!(session.user_id, user_id);
        assert_eq!(session.created_at, created_at);
        assert_eq!(session.token, "new");
        assert_eq!(session.refreshed_at, later);
        assert_eq!(session.expires_at, later + Duration::hours(1));
    }

    #[test]
    fn test_time_to_live() {
        let now = Utc::now();
        let session = Session::new(UserId::now_v7(), "t".into(), now, Duration::minutes(5));

        assert_eq!(session.time_to_live(now), Some(Duration::minutes(5)));
        assert!(!session.is_expired_at(now));
        assert_eq!(session.time_to_live(now + Duration::minutes(5)), None);
        assert!(session.is_expired_at(now + Duration::minutes(6)));
    }
}
