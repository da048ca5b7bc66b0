//! Opaque refresh-token generation and at-rest hashing.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of refresh-session tokens (alphanumeric characters).
pub const SESSION_TOKEN_LENGTH: usize = 32;

/// Generate an unguessable alphanumeric string of `length` characters.
///
/// Draws from the thread-local generator, a CSPRNG seeded from the OS.
pub fn generate_token(length: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Generate a refresh-session token.
pub fn generate_session_token() -> String {
    generate_token(SESSION_TOKEN_LENGTH)
}

/// Compute the SHA-256 hex digest of a session token.
///
/// Stores persist only this digest; lookups hash the presented token.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generated_token_shape() {
        let token = generate_token(48);
        assert_eq!(token.len(), 48);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(generate_session_token().len(), SESSION_TOKEN_LENGTH);
    }

    #[test]
    fn test_tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_session_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_zero_length_token() {
        assert!(generate_token(0).is_empty());
    }

    #[test]
    fn test_token_hash_is_stable() {
        let token = generate_session_token();
        let hash = hash_session_token(&token);
        assert_eq!(hash, hash_session_token(&token));
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, hash_session_token("something-else"));
    }
}
