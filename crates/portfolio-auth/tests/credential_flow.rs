//! Integration tests: password check feeding token issuance and verification

use portfolio_auth::{
    AuthError, DEFAULT_TOKEN_TTL_SECS, TokenKeys, bearer_token, hash_password, verify,
    verify_password,
};

#[test]
fn test_login_then_authenticate() {
    let stored_hash = hash_password("pw123").unwrap();
    let keys = TokenKeys::new(b"server-secret", DEFAULT_TOKEN_TTL_SECS);
    let now = 1_700_000_000;

    // Login
    assert!(verify_password("pw123", &stored_hash).unwrap());
    let issued = keys.issue("alice-id", "a@x.com", now).unwrap();

    // Authenticate a later request
    let header = format!("Bearer {}", issued.token);
    let token = bearer_token(Some(&header)).unwrap();
    let claims = verify(token, b"server-secret", now + 3600).unwrap();

    assert_eq!(claims.user_id, "alice-id");
    assert_eq!(claims.iat, now);
    assert_eq!(claims.exp, now + DEFAULT_TOKEN_TTL_SECS);
}

#[test]
fn test_token_dies_after_a_day() {
    let keys = TokenKeys::new(b"server-secret", DEFAULT_TOKEN_TTL_SECS);
    let now = 1_700_000_000;
    let issued = keys.issue("alice-id", "a@x.com", now).unwrap();

    let just_before = now + DEFAULT_TOKEN_TTL_SECS - 1;
    let at_expiry = now + DEFAULT_TOKEN_TTL_SECS;

    assert!(keys.verify(&issued.token, just_before).is_ok());
    assert!(matches!(
        keys.verify(&issued.token, at_expiry),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn test_tokens_are_not_portable_across_secrets() {
    let prod = TokenKeys::new(b"prod-secret", DEFAULT_TOKEN_TTL_SECS);
    let staging = TokenKeys::new(b"staging-secret", DEFAULT_TOKEN_TTL_SECS);
    let now = 1_700_000_000;

    let issued = staging.issue("alice-id", "a@x.com", now).unwrap();
    assert!(matches!(
        prod.verify(&issued.token, now),
        Err(AuthError::InvalidToken)
    ));
}
