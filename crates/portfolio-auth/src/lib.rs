//! portfolio-auth: credentials and bearer tokens for the portfolio backend
//!
//! Stateless building blocks of the auth gate. Nothing in here touches
//! storage; callers look accounts up themselves and use these helpers to
//! check passwords and mint or verify tokens.
//!
//! ## Example
//!
//! ```rust,ignore
//! use portfolio_auth::{TokenKeys, hash_password, verify_password, unix_now};
//!
//! let hash = hash_password("pw123")?;
//! assert!(verify_password("pw123", &hash)?);
//!
//! let keys = TokenKeys::new(b"secret", portfolio_auth::DEFAULT_TOKEN_TTL_SECS);
//! let issued = keys.issue("owner-id", "a@x.com", unix_now())?;
//! let claims = keys.verify(&issued.token, unix_now())?;
//! assert_eq!(claims.user_id, "owner-id");
//! ```

mod bearer;
mod error;
mod password;
mod token;

// Re-exports
pub use bearer::bearer_token;
pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_password};
pub use token::{Claims, DEFAULT_TOKEN_TTL_SECS, IssuedToken, TokenKeys, unix_now, verify};
