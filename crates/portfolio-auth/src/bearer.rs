//! `Authorization` header parsing

use crate::error::{AuthError, AuthResult};

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// An absent header, a scheme other than `Bearer`, or an empty token all
/// count as no credential at all.
pub fn bearer_token(header: Option<&str>) -> AuthResult<&str> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::MissingToken),
    }
}
