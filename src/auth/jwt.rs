//! Account token issuance and verification
//!
//! Both halves of the credential contract live here: the claim shape, the
//! signing algorithm and the keys. Tokens carry exactly an account number and
//! an expiry.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Signing secret is missing")]
    MissingSecret,

    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Malformed claims: {0}")]
    MalformedClaims(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Claims embedded in an account token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AccountClaims {
    /// Account number of the issuing account, widened to 64 bits
    #[serde(rename = "accountNumber")]
    pub account_number: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Issues and verifies account tokens with one pre-shared HMAC secret
#[derive(Clone)]
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("algorithm", &ALGORITHM)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenAuthority {
    /// Build an authority from the configured secret and token lifetime
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }

        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for an already persisted account
    pub fn issue(&self, account_number: i32) -> Result<String, JwtError> {
        self.issue_at(account_number, Utc::now())
    }

    /// Issue a token as if minted at `issued_at`
    pub fn issue_at(
        &self,
        account_number: i32,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let expires_at = issued_at.checked_add_signed(self.ttl).ok_or_else(|| {
            JwtError::EncodingFailed("token expiry is out of range".to_string())
        })?;

        let claims = AccountClaims {
            account_number: i64::from(account_number),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify signature and expiry, then decode the typed claims
    ///
    /// # Returns
    /// * `Ok(AccountClaims)` if the token is valid
    /// * `Err(JwtError)` if validation fails
    pub fn verify(&self, token: &str) -> Result<AccountClaims, JwtError> {
        let token_data = decode::<AccountClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                    JwtError::MalformedClaims(e.to_string())
                }
                _ => JwtError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}
