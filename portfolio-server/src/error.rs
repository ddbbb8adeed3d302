use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use portfolio_auth::AuthError;
use portfolio_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access token required")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    /// Record kind, e.g. "Project"
    #[error("{0} not found")]
    NotFound(String),

    #[error("Only image files are allowed")]
    UnsupportedMediaType,

    #[error("File too large")]
    PayloadTooLarge,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Conflict(_)
            | ServerError::InvalidCredentials
            | ServerError::Validation(_)
            | ServerError::BadRequest(_)
            | ServerError::UnsupportedMediaType
            | ServerError::PayloadTooLarge => StatusCode::BAD_REQUEST,
            ServerError::MissingToken => StatusCode::UNAUTHORIZED,
            ServerError::InvalidToken => StatusCode::FORBIDDEN,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ServerError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                json!({ "message": "Server error", "error": msg })
            }
            other => json!({ "message": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => ServerError::Validation(msg),
            StoreError::NotFound(kind) => ServerError::NotFound(kind),
            StoreError::Conflict(msg) => ServerError::Conflict(msg),
            StoreError::InvalidName(name) => {
                ServerError::BadRequest(format!("Invalid upload name: {name}"))
            }
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingToken => ServerError::MissingToken,
            AuthError::InvalidToken => ServerError::InvalidToken,
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("blocking task failed: {err}"))
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
