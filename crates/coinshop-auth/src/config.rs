//! Authentication configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT configuration
    #[serde(default)]
    pub jwt: JwtConfig,
    /// Password hashing configuration
    #[serde(default)]
    pub password: PasswordConfig,
}

/// JWT token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens (should be at least 256 bits)
    pub secret: String,
    /// Token lifetime
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,
    /// Token issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set in production
            token_lifetime: Duration::from_secs(24 * 60 * 60),
            issuer: "coinshop".to_string(),
        }
    }
}

/// Password hashing configuration (Argon2id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Time cost (iterations)
    pub time_cost: u32,
    /// Parallelism factor
    pub parallelism: u32,
    /// Output hash length in bytes
    pub hash_length: u32,
    /// Minimum password length. Any non-empty secret is accepted by
    /// default; existing callers send arbitrary short passwords.
    pub min_password_length: usize,
    /// Maximum password length (to prevent hashing-cost abuse)
    pub max_password_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19456, // 19 MiB
            time_cost: 2,
            parallelism: 1,
            hash_length: 32,
            min_password_length: 1,
            max_password_length: 128,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_accept_short_secrets() {
        let config = PasswordConfig::default();
        assert_eq!(config.min_password_length, 1);
    }

    #[test]
    fn jwt_lifetime_roundtrips_through_humantime() {
        let config = JwtConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: JwtConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.token_lifetime, config.token_lifetime);
    }
}
