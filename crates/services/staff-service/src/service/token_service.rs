//! Access token issuing and decoding.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AppResult, JwtConfig};
use domain::{Entity, UserAccount};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Token type reported to clients
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Account id
    pub sub: Uuid,
    /// Normalized user name
    pub name: String,
    /// Security stamp at issue time
    pub sstamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Uuid>,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Token service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token carrying the account's id, name and security stamp
    fn issue(&self, account: &UserAccount) -> AppResult<IssuedToken>;

    /// Verify signature, expiry and issuer, then return the claims
    fn decode(&self, token: &str) -> AppResult<TokenClaims>;
}

/// HS256 implementation of TokenService.
pub struct JwtTokenService {
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, account: &UserAccount) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.expiration_hours);

        let claims = TokenClaims {
            sub: account.id(),
            name: account.user_name().to_string(),
            sstamp: account.security_stamp().to_string(),
            role: account.role_id(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret_bytes()),
        )?;

        Ok(IssuedToken {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.config.expiration_seconds(),
        })
    }

    fn decode(&self, token: &str) -> AppResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.secret_bytes()),
            &validation,
        )?;

        Ok(token_data.claims)
    }
}
