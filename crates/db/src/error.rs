//! Translation of sqlx failures into store errors.

use weatherapp_core::store::StoreError;

/// PostgreSQL unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Classify a sqlx error for the given entity.
///
/// - `RowNotFound` becomes [`StoreError::NotFound`].
/// - Unique violations on a known constraint become [`StoreError::AlreadyExists`]
///   naming the offending field.
/// - Everything else becomes [`StoreError::Backend`].
pub fn classify(err: sqlx::Error, entity: &'static str) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound { entity, field: "id" },
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            let field = db_err
                .constraint()
                .and_then(constraint_field)
                .unwrap_or("id");
            StoreError::AlreadyExists { entity, field }
        }
        _ => StoreError::Backend(err.to_string()),
    }
}

/// Map a unique constraint name to the column it protects.
fn constraint_field(constraint: &str) -> Option<&'static str> {
    match constraint {
        "uq_users_login" => Some("login"),
        "uq_sessions_token_hash" => Some("token"),
        "users_pkey" | "sessions_pkey" => Some("id"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_row_not_found() {
        assert_matches!(
            classify(sqlx::Error::RowNotFound, "user"),
            StoreError::NotFound { entity: "user", .. }
        );
    }

    #[test]
    fn test_other_errors_are_backend() {
        assert_matches!(
            classify(sqlx::Error::PoolTimedOut, "session"),
            StoreError::Backend(_)
        );
    }

    #[test]
    fn test_constraint_names() {
        assert_eq!(constraint_field("uq_users_login"), Some("login"));
        assert_eq!(constraint_field("uq_sessions_token_hash"), Some("token"));
        assert_eq!(constraint_field("something_else"), None);
    }
}
