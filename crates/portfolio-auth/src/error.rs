//! Auth gate error types

use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable bearer credential on the request
    #[error("Access token required")]
    MissingToken,

    /// Bad signature, malformed token or past its expiry
    #[error("Invalid token")]
    InvalidToken,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}
