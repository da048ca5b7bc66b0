//! Credential primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed, time-bound access tokens.
//! - [`token`] -- opaque refresh-token generation.

pub mod jwt;
pub mod password;
pub mod token;
