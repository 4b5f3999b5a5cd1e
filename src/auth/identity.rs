//! Identity provider implementation
//!
//! Resolves the caller of a write endpoint from its `Authorization` header.

use super::types::{Claims, Identity, TokenType};
use crate::config::AuthSettings;
use crate::error::{Error, Result};
use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Resolves the current caller for write operations
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the caller from an `Authorization` header value
    async fn identify(&self, authorization: Option<&str>) -> Result<Identity>;
}

/// HS256 JWT identity provider
pub struct JwtIdentityProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Lifetime of issued access tokens
    access_token_ttl: u64,
}

impl std::fmt::Debug for JwtIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityProvider")
            .field("access_token_ttl", &self.access_token_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtIdentityProvider {
    /// Create a provider with the given HMAC secret
    pub fn new(secret: &str, access_token_ttl: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_ttl,
        }
    }

    /// Create a provider from auth settings
    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(&settings.jwt_secret, settings.access_token_ttl_seconds)
    }

    /// Sign a token for a user
    pub fn issue(&self, user_id: i64, token_type: TokenType, lifetime_seconds: u64) -> Result<String> {
        let claims = Claims::new(user_id, token_type, lifetime_seconds);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            Error::TokenGeneration {
                message: format!("Failed to encode JWT: {e}"),
            }
        })
    }

    /// Sign an access token with the configured lifetime
    pub fn issue_access_token(&self, user_id: i64) -> Result<String> {
        self.issue(user_id, TokenType::Access, self.access_token_ttl)
    }

    /// Verify a token's signature and expiry
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Error::auth(format!("Invalid token: {e}")))
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn identify(&self, authorization: Option<&str>) -> Result<Identity> {
        let header = authorization.ok_or_else(|| Error::auth("Missing Authorization header"))?;
        let token = bearer_token(header)?;
        let claims = self.verify(token)?;

        if claims.token_type != TokenType::Access {
            tracing::warn!("Rejected non-access token for subject {}", claims.sub);
            return Err(Error::auth("Access token required"));
        }

        let user_id = claims
            .sub
            .parse()
            .map_err(|_| Error::auth(format!("Invalid token subject: {}", claims.sub)))?;

        Ok(Identity { user_id })
    }
}

/// Extract the token from a `Bearer <token>` header value
pub fn bearer_token(header: &str) -> Result<&str> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(Error::auth("Malformed Authorization header")),
    }
}
