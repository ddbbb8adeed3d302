//! Signed, time-limited bearer tokens (HS256 JWT)
//!
//! A token is the whole credential: there is no server-side session and no
//! revocation list. It moves `issued -> valid -> expired` and never back.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Default token lifetime: 24 hours
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Claims carried by every token
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Owning account id
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    /// Issued at (Unix seconds)
    pub iat: u64,
    /// Expires at (Unix seconds)
    pub exp: u64,
}

impl Claims {
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, iat: u64, ttl_secs: u64) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            iat,
            exp: iat.saturating_add(ttl_secs),
        }
    }

    /// Expired from the instant `exp` is reached
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.exp
    }
}

/// A freshly minted token and the claims inside it
#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Signing material plus token lifetime
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    /// Sign a token for `user_id` valid from `now` for the configured ttl
    pub fn issue(&self, user_id: &str, email: &str, now: u64) -> AuthResult<IssuedToken> {
        let claims = Claims::new(user_id, email, now, self.ttl_secs);
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Encoding(e.to_string()))?;
        Ok(IssuedToken { token, claims })
    }

    /// Check signature and expiry against `now`
    pub fn verify(&self, token: &str, now: u64) -> AuthResult<Claims> {
        decode_with(token, &self.decoding, now)
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

/// Verify `token` was signed with `secret` and has not expired at `now`
pub fn verify(token: &str, secret: &[u8], now: u64) -> AuthResult<Claims> {
    decode_with(token, &DecodingKey::from_secret(secret), now)
}

fn decode_with(token: &str, key: &DecodingKey, now: u64) -> AuthResult<Claims> {
    // Expiry is checked against the caller's clock, not the library's
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;

    let data = jsonwebtoken::decode::<Claims>(token, key, &validation)
        .map_err(|_| AuthError::InvalidToken)?;

    if data.claims.is_expired(now) {
        return Err(AuthError::InvalidToken);
    }
    Ok(data.claims)
}

/// Current Unix time in seconds
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
