//! Application state shared across handlers

use std::sync::Arc;

use coinshop_auth::{AuthError, IdentityGate, PasswordService};
use coinshop_db::Database;
use coinshop_ledger::{CredentialScheme, Ledger};
use coinshop_types::LedgerError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The ledger engine
    pub ledger: Ledger,
    /// Identity gate resolving bearer tokens to account names
    pub identity: IdentityGate,
}

impl AppState {
    /// Wire the ledger to the store and the identity gate's credential
    /// scheme.
    pub fn new(db: Database, identity: IdentityGate) -> Self {
        let credentials = Arc::new(ArgonCredentials(identity.password.clone()));
        Self {
            ledger: Ledger::new(db, credentials),
            identity,
        }
    }
}

/// Ledger credential seam backed by Argon2id.
pub struct ArgonCredentials(pub PasswordService);

impl CredentialScheme for ArgonCredentials {
    fn protect(&self, secret: &str) -> coinshop_types::Result<String> {
        self.0.hash_password(secret).map_err(|e| match e {
            AuthError::WeakPassword(_) => LedgerError::WrongCredential,
            other => LedgerError::storage(other.to_string()),
        })
    }

    fn verify(&self, secret: &str, protected: &str) -> coinshop_types::Result<bool> {
        self.0
            .verify_password(secret, protected)
            .map_err(|e| LedgerError::storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinshop_auth::PasswordConfig;

    #[test]
    fn argon_scheme_roundtrip() {
        let service = PasswordService::new(PasswordConfig {
            memory_cost: 1024,
            time_cost: 1,
            ..Default::default()
        });
        let scheme = ArgonCredentials(service);

        let protected = scheme.protect("pw").unwrap();
        assert!(scheme.verify("pw", &protected).unwrap());
        assert!(!scheme.verify("other", &protected).unwrap());
    }
}
