//! Shape checks for login/password input.
//!
//! Both fields are checked independently and every failure is reported, so a
//! caller sending an empty form learns about both problems in one round trip.

use validator::Validate;

use crate::error::{CoreError, ValidationErrors};

#[derive(Debug, Validate)]
struct CredentialsInput {
    #[validate(length(min = 3, message = "should be at least 3 characters long"))]
    login: String,
    #[validate(length(min = 6, message = "should be at least 6 characters long"))]
    password: String,
}

/// Validate a login/password pair, aggregating every field violation.
pub fn validate_credentials(login: &str, password: &str) -> Result<(), CoreError> {
    let input = CredentialsInput {
        login: login.to_owned(),
        password: password.to_owned(),
    };

    let Err(errors) = input.validate() else {
        return Ok(());
    };

    let mut aggregate = ValidationErrors::new();
    for (field, field_errors) in errors.field_errors() {
        for err in field_errors {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            aggregate.add(field.to_string(), message);
        }
    }
    aggregate.into_result()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_valid_credentials_pass() {
        assert!(validate_credentials("bob", "secret").is_ok());
    }

    #[test]
    fn test_short_login_rejected() {
        let err = validate_credentials("ab", "long-enough").unwrap_err();
        assert_matches!(err, CoreError::Validation(ref v) if v.has_field("login") && v.violations().len() == 1);
    }

    #[test]
    fn test_short_password_rejected() {
        let err = validate_credentials("alice", "12345").unwrap_err();
        assert_matches!(err, CoreError::Validation(ref v) if v.has_field("password") && v.violations().len() == 1);
    }

    #[test]
    fn test_both_fields_reported_together() {
        let err = validate_credentials("a", "b").unwrap_err();
        let CoreError::Validation(violations) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(violations.violations().len(), 2);
        assert!(violations.has_field("login"));
        assert!(violations.has_field("password"));
    }

    #[test]
    fn test_length_counts_characters() {
        // Three multi-byte characters form a valid login.
        assert!(validate_credentials("äöü", "пароль").is_ok());
    }
}
