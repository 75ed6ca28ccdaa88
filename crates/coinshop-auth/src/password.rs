//! Password service
//!
//! Argon2id hashing with configurable parameters and constant-time
//! verification. The strength policy is permissive by default: callers of
//! this service historically register with arbitrary short passwords, so
//! only emptiness and an upper length bound are enforced out of the box.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};

use crate::config::PasswordConfig;
use crate::error::{AuthError, AuthResult};

/// Password service for hashing and verification
#[derive(Clone)]
pub struct PasswordService {
    config: PasswordConfig,
}

impl PasswordService {
    /// Create a new password service
    pub fn new(config: PasswordConfig) -> Self {
        Self { config }
    }

    /// Hash a password using Argon2id
    pub fn hash_password(&self, password: &str) -> AuthResult<String> {
        self.validate_password_strength(password)?;

        let salt = SaltString::generate(&mut OsRng);

        let params = Params::new(
            self.config.memory_cost,
            self.config.time_cost,
            self.config.parallelism,
            Some(self.config.hash_length as usize),
        )
        .map_err(|e| AuthError::Internal(format!("Invalid Argon2 params: {}", e)))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AuthError::PasswordHashingFailed)?;

        Ok(hash.to_string())
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> AuthResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|_| AuthError::PasswordVerificationFailed)?;

        let argon2 = Argon2::default();
        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(_) => Err(AuthError::PasswordVerificationFailed),
        }
    }

    /// Validate password strength against the configured policy
    pub fn validate_password_strength(&self, password: &str) -> AuthResult<()> {
        if password.len() < self.config.min_password_length {
            return Err(AuthError::WeakPassword(format!(
                "Password must be at least {} characters",
                self.config.min_password_length
            )));
        }

        if password.len() > self.config.max_password_length {
            return Err(AuthError::WeakPassword(format!(
                "Password must be at most {} characters",
                self.config.max_password_length
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> PasswordService {
        // keep the cost parameters small so the suite stays fast
        PasswordService::new(PasswordConfig {
            memory_cost: 1024,
            time_cost: 1,
            ..Default::default()
        })
    }

    #[test]
    fn hash_and_verify() {
        let service = test_service();

        let hash = service.hash_password("pw").unwrap();
        assert_ne!(hash, "pw");
        assert!(service.verify_password("pw", &hash).unwrap());
        assert!(!service.verify_password("other", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let service = test_service();

        let a = service.hash_password("pw").unwrap();
        let b = service.hash_password("pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_password_is_rejected() {
        let service = test_service();
        assert!(matches!(
            service.hash_password(""),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn garbage_hash_fails_verification() {
        let service = test_service();
        assert!(matches!(
            service.verify_password("pw", "not-a-phc-string"),
            Err(AuthError::PasswordVerificationFailed)
        ));
    }
}
