use crate::middleware::require_auth;
use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use portfolio_store::{Experience, Project, Skill};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod auth;
mod health;
mod personal_info;
mod portfolio;
mod records;
mod upload;

/// Room for multipart framing around an image at the size ceiling
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// `{message}` body for operations that return no record
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let upload_limit = state.config.uploads.max_bytes + MULTIPART_OVERHEAD;

    let protected = Router::new()
        .route("/api/personal-info", put(personal_info::upsert_personal_info))
        .route("/api/projects", post(records::create::<Project>))
        .route(
            "/api/projects/{id}",
            put(records::update::<Project>).delete(records::delete::<Project>),
        )
        .route("/api/experience", post(records::create::<Experience>))
        .route(
            "/api/experience/{id}",
            put(records::update::<Experience>).delete(records::delete::<Experience>),
        )
        .route("/api/skills", post(records::create::<Skill>))
        .route(
            "/api/skills/{id}",
            put(records::update::<Skill>).delete(records::delete::<Skill>),
        )
        .route(
            "/api/upload",
            post(upload::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/personal-info", get(personal_info::get_personal_info))
        .route("/api/projects", get(records::list::<Project>))
        .route("/api/experience", get(records::list::<Experience>))
        .route("/api/skills", get(records::list::<Skill>))
        .route("/api/portfolio/{user_id}", get(portfolio::get_portfolio))
        .route("/uploads/{name}", get(upload::serve_upload));

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
