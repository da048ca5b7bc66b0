//! Row type for the `users` table.

use sqlx::FromRow;
use weatherapp_core::models::User;
use weatherapp_core::types::{Timestamp, UserId};

/// Full user row. Contains the password hash -- never serialize it.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: UserId,
    pub login: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            login: row.login,
            password_hash: row.password_hash,
        }
    }
}
