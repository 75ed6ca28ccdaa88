//! JWT token service
//!
//! HS256 bearer tokens carrying the authenticated account name. Issue and
//! verify only; there is no refresh or revocation tier in this service.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::types::TokenClaims;

/// JWT service for token management
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a bearer token for an authenticated account.
    pub fn issue(&self, name: &str) -> AuthResult<String> {
        let now = Utc::now();
        let lifetime = Duration::from_std(self.config.token_lifetime)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let claims = TokenClaims {
            sub: name.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            iss: self.config.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token: {}", e)))?;

        Ok(token)
    }

    /// Validate a token and return its claims.
    pub fn verify(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation.validate_exp = true;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Validate an `Authorization` header value and return the verified
    /// account name. Accepts only the `Bearer <token>` form.
    pub fn verify_bearer(&self, header: Option<&str>) -> AuthResult<String> {
        let header = header.ok_or(AuthError::Unauthenticated)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        Ok(self.verify(token)?.sub)
    }
}
