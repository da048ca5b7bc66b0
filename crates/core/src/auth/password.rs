//! Argon2id password hashing and verification.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::config::HashConfig;
use crate::error::CoreError;

/// Plaintext behind the dummy hash used to keep unknown-login checks as slow
/// as real ones.
const DUMMY_PASSWORD: &str = "dummy-password-for-timing-equalization";

/// Salted, adaptive password hasher.
#[derive(Debug)]
pub struct CredentialHasher {
    config: HashConfig,
    dummy_hash: OnceLock<Option<String>>,
}

impl CredentialHasher {
    pub fn new(config: HashConfig) -> Self {
        Self {
            config,
            dummy_hash: OnceLock::new(),
        }
    }

    /// Build the Argon2id context. Unsupported cost parameters surface here.
    fn argon2(&self) -> Result<Argon2<'static>, CoreError> {
        let params = Params::new(
            self.config.memory_kib,
            self.config.iterations,
            self.config.parallelism,
            None,
        )
        .map_err(|e| CoreError::Internal(format!("Unsupported Argon2 parameters: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Returns the PHC-formatted hash string. Two calls with the same input
    /// produce different outputs.
    pub fn hash(&self, password: &str) -> Result<String, CoreError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored PHC hash.
    ///
    /// Returns `Ok(false)` on a normal mismatch. Only a malformed stored hash
    /// is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, CoreError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| CoreError::Internal(format!("Malformed password hash: {e}")))?;
        match self.argon2()?.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CoreError::Internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }

    /// Burn one verification's worth of work against a fixed hash.
    ///
    /// The result is discarded; callers use this when there is no stored hash
    /// to check against.
    pub fn verify_dummy(&self, password: &str) {
        let dummy = self
            .dummy_hash
            .get_or_init(|| self.hash(DUMMY_PASSWORD).ok());
        if let Some(hash) = dummy {
            let _ = self.verify(password, hash);
        }
    }

    /// Whether the dummy hash has been built, i.e. `verify_dummy` has run.
    #[cfg(test)]
    pub(crate) fn dummy_hash_ready(&self) -> bool {
        matches!(self.dummy_hash.get(), Some(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(HashConfig::fast_for_tests())
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let password = "correct-horse-battery-staple";
        let hash = hasher.hash(password).expect("hashing should succeed");

        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );

        let verified = hasher.verify(password, &hash).expect("verify should succeed");
        assert!(verified, "correct password should verify as true");
    }

    #[test]
    fn test_wrong_password_fails() {
        let hasher = hasher();
        let hash = hasher.hash("real-password").expect("hashing should succeed");
        let verified = hasher
            .verify("wrong-password", &hash)
            .expect("verify should succeed");
        assert!(!verified, "wrong password should verify as false");
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hasher = hasher();
        let a = hasher.hash("same-password").unwrap();
        let b = hasher.hash("same-password").unwrap();
        assert_ne!(a, b, "salts must differ between calls");
    }

    #[test]
    fn test_malformed_hash_is_internal_error() {
        let result = hasher().verify("whatever", "not-a-phc-string");
        assert_matches!(result, Err(CoreError::Internal(_)));
    }

    #[test]
    fn test_unsupported_params_is_internal_error() {
        let hasher = CredentialHasher::new(HashConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert_matches!(hasher.hash("password"), Err(CoreError::Internal(_)));
    }

    #[test]
    fn test_verify_dummy_builds_and_reuses_real_hash() {
        let hasher = hasher();
        assert!(!hasher.dummy_hash_ready());

        hasher.verify_dummy("anything");
        assert!(hasher.dummy_hash_ready());
        let first = hasher.dummy_hash.get().cloned().flatten().unwrap();
        assert!(first.starts_with("$argon2id$"));
        assert!(hasher.verify(DUMMY_PASSWORD, &first).unwrap());

        hasher.verify_dummy("anything-else");
        let second = hasher.dummy_hash.get().cloned().flatten().unwrap();
        assert_eq!(first, second, "dummy hash is built once");
    }
}
