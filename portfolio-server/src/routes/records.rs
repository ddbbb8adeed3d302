//! CRUD handlers shared by projects, experience and skills

use super::MessageResponse;
use crate::error::{ServerError, ServerResult};
use crate::middleware::VerifiedIdentity;
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use portfolio_store::{Experience, OwnerId, Project, Record, RecordId, Repository, Skill};
use serde::Deserialize;
use serde_json::Value;

/// A record kind with its own repository in [`AppState`]
pub trait RoutedRecord: Record {
    fn repository(state: &AppState) -> &Repository<Self>;
}

impl RoutedRecord for Project {
    fn repository(state: &AppState) -> &Repository<Self> {
        &state.projects
    }
}

impl RoutedRecord for Experience {
    fn repository(state: &AppState) -> &Repository<Self> {
        &state.experience
    }
}

impl RoutedRecord for Skill {
    fn repository(state: &AppState) -> &Repository<Self> {
        &state.skills
    }
}

/// `?userId=` on public reads
#[derive(Deserialize)]
pub struct OwnerQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

impl OwnerQuery {
    pub fn owner(self) -> ServerResult<OwnerId> {
        match self.user_id {
            Some(id) if !id.trim().is_empty() => Ok(OwnerId::from(id)),
            _ => Err(ServerError::BadRequest(
                "userId query parameter is required".into(),
            )),
        }
    }
}

/// GET /api/{kind}?userId=
pub async fn list<R: RoutedRecord>(
    State(state): State<AppState>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> ServerResult<Json<Vec<R>>> {
    let Query(query) = query?;
    let owner = query.owner()?;
    let records = R::repository(&state).list(&owner).await?;
    Ok(Json(records))
}

/// POST /api/{kind}
pub async fn create<R: RoutedRecord>(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<R>)> {
    let Json(payload) = payload?;
    let record = R::repository(&state).create(&identity.owner, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/{kind}/{id}
pub async fn update<R: RoutedRecord>(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServerResult<Json<R>> {
    let Json(payload) = payload?;
    let record = R::repository(&state)
        .update(&identity.owner, &RecordId::from(id), payload)
        .await?;
    Ok(Json(record))
}

/// DELETE /api/{kind}/{id}
pub async fn delete<R: RoutedRecord>(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    Path(id): Path<String>,
) -> ServerResult<Json<MessageResponse>> {
    R::repository(&state)
        .delete(&identity.owner, &RecordId::from(id))
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "{} deleted successfully",
        R::LABEL
    ))))
}
