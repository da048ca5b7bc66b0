//! User identity record.

use crate::types::UserId;

/// A registered user.
///
/// Contains the password hash -- NEVER serialize this to API responses.
/// `login` is unique across all users and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub password_hash: String,
}

impl User {
    /// Build a new user with a freshly generated id.
    pub fn new(login: impl Into<String>, password_hash: String) -> Self {
        Self {
            id: UserId::now_v7(),
            login: login.into(),
            password_hash,
        }
    }
}
