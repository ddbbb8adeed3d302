use crate::error::ServerResult;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::{AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use portfolio_auth::{TokenKeys, bearer_token, unix_now};
use portfolio_store::OwnerId;

/// Verified request identity, inserted into request extensions
#[derive(Clone, Debug)]
pub struct VerifiedIdentity {
    pub owner: OwnerId,
    pub email: String,
}

/// Resolve the bearer token on a request into an identity
pub fn authenticate(headers: &HeaderMap, tokens: &TokenKeys) -> ServerResult<VerifiedIdentity> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let token = bearer_token(header)?;
    let claims = tokens.verify(token, unix_now())?;

    Ok(VerifiedIdentity {
        owner: OwnerId::from(claims.user_id),
        email: claims.email,
    })
}

/// Middleware that rejects requests without a valid bearer token
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ServerResult<Response> {
    let identity = authenticate(request.headers(), &state.tokens)?;
    tracing::debug!(owner = %identity.owner, "authenticated request");

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
