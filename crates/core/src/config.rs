//! Credential and session settings loaded from the environment.

use chrono::Duration;

/// Default refresh-session lifetime: 30 days.
const DEFAULT_SESSION_DURATION_MINS: i64 = 30 * 24 * 60;
/// Default access-token lifetime.
const DEFAULT_ACCESS_TOKEN_DURATION_MINS: i64 = 15;
/// Upper bound for any configured lifetime: 100 years. Keeps `now + duration`
/// inside chrono's representable range.
const MAX_DURATION_MINS: i64 = 100 * 365 * 24 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    /// The `argon2` crate's recommended defaults.
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl HashConfig {
    /// Minimal cost so test suites stay fast. Never use in production.
    pub fn fast_for_tests() -> Self {
        Self {
            memory_kib: argon2::Params::MIN_M_COST,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// Settings consumed by [`crate::service::AuthService`].
#[derive(Clone)]
pub struct AuthConfig {
    /// Refresh-session lifetime.
    pub session_duration: Duration,
    /// Access-token lifetime.
    pub access_token_duration: Duration,
    /// Symmetric signing key for access tokens. Never empty.
    pub token_secret: Vec<u8>,
    pub hash: HashConfig,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_duration", &self.session_duration)
            .field("access_token_duration", &self.access_token_duration)
            .field("token_secret", &"<redacted>")
            .field("hash", &self.hash)
            .finish()
    }
}

impl AuthConfig {
    /// Load auth configuration from environment variables.
    ///
    /// | Env Var                           | Required | Default  |
    /// |-----------------------------------|----------|----------|
    /// | `AUTH_TOKEN_SECRET`               | **yes**  | --       |
    /// | `AUTH_SESSION_DURATION_MINS`      | no       | `43200`  |
    /// | `AUTH_ACCESS_TOKEN_DURATION_MINS` | no       | `15`     |
    /// | `AUTH_HASH_MEMORY_KIB`            | no       | `19456`  |
    /// | `AUTH_HASH_ITERATIONS`            | no       | `2`      |
    /// | `AUTH_HASH_PARALLELISM`           | no       | `1`      |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_secret = lookup("AUTH_TOKEN_SECRET")
            .ok_or(ConfigError::Missing("AUTH_TOKEN_SECRET"))?
            .into_bytes();
        if token_secret.is_empty() {
            return Err(ConfigError::Invalid {
                name: "AUTH_TOKEN_SECRET",
                reason: "must not be empty".into(),
            });
        }

        let session_mins = parse_or(
            &lookup,
            "AUTH_SESSION_DURATION_MINS",
            DEFAULT_SESSION_DURATION_MINS,
        )?;
        let access_mins = parse_or(
            &lookup,
            "AUTH_ACCESS_TOKEN_DURATION_MINS",
            DEFAULT_ACCESS_TOKEN_DURATION_MINS,
        )?;
        let session_duration = duration_mins("AUTH_SESSION_DURATION_MINS", session_mins)?;
        let access_token_duration =
            duration_mins("AUTH_ACCESS_TOKEN_DURATION_MINS", access_mins)?;

        let defaults = HashConfig::default();
        let hash = HashConfig {
            memory_kib: parse_or(&lookup, "AUTH_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "AUTH_HASH_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "AUTH_HASH_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            session_duration,
            access_token_duration,
            token_secret,
            hash,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}

fn duration_mins(name: &'static str, value: i64) -> Result<Duration, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::Invalid {
            name,
            reason: "must be greater than zero".into(),
        });
    }
    if value > MAX_DURATION_MINS {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("must not exceed {MAX_DURATION_MINS} minutes"),
        });
    }
    Duration::try_minutes(value).ok_or(ConfigError::Invalid {
        name,
        reason: "out of range".into(),
    })
}
