//! Coinshop identity gate
//!
//! Supplies a verified account name for each incoming call:
//!
//! - **Password security**: Argon2id hashing
//! - **Bearer tokens**: HS256 JWTs carrying the account name
//!
//! The ledger engine trusts the name this gate yields and performs no
//! further identity checks of its own.

pub mod config;
pub mod error;
pub mod jwt;
pub mod password;
pub mod types;

pub use config::{AuthConfig, JwtConfig, PasswordConfig};
pub use error::{AuthError, AuthResult};
pub use jwt::JwtService;
pub use password::PasswordService;
pub use types::TokenClaims;

/// The identity gate: token issuance and verification plus credential
/// protection, bundled for the boundary layer.
#[derive(Clone)]
pub struct IdentityGate {
    pub jwt: JwtService,
    pub password: PasswordService,
}

impl IdentityGate {
    /// Create the gate from configuration.
    pub fn new(config: AuthConfig) -> Self {
        Self {
            jwt: JwtService::new(config.jwt),
            password: PasswordService::new(config.password),
        }
    }

    /// Issue a bearer token for an authenticated account name.
    pub fn issue(&self, name: &str) -> AuthResult<String> {
        self.jwt.issue(name)
    }

    /// Resolve an `Authorization` header into a verified account name.
    pub fn verify(&self, authorization: Option<&str>) -> AuthResult<String> {
        self.jwt.verify_bearer(authorization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_roundtrip() {
        let gate = IdentityGate::new(AuthConfig {
            jwt: JwtConfig {
                secret: "test-secret-key-for-tokens-min-32-bytes!".to_string(),
                ..Default::default()
            },
            ..Default::default()
        });

        let token = gate.issue("alice").unwrap();
        let name = gate.verify(Some(&format!("Bearer {token}"))).unwrap();
        assert_eq!(name, "alice");
    }
}
