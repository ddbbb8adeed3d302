use super::records::OwnerQuery;
use crate::error::{ServerError, ServerResult};
use crate::middleware::VerifiedIdentity;
use crate::state::AppState;
use axum::{
    Extension, Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use portfolio_store::{PersonalInfo, Record, UpsertOutcome};
use serde_json::Value;

/// GET /api/personal-info?userId=
pub async fn get_personal_info(
    State(state): State<AppState>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> ServerResult<Json<PersonalInfo>> {
    let Query(query) = query?;
    let owner = query.owner()?;
    let info = state
        .personal_info
        .find_one(&owner)
        .await?
        .ok_or_else(|| ServerError::NotFound(PersonalInfo::LABEL.into()))?;
    Ok(Json(info))
}

/// PUT /api/personal-info
pub async fn upsert_personal_info(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServerResult<Json<PersonalInfo>> {
    let Json(payload) = payload?;
    let (info, outcome) = state.personal_info.upsert(&identity.owner, payload).await?;

    match outcome {
        UpsertOutcome::Created => tracing::info!(owner = %identity.owner, "personal info created"),
        UpsertOutcome::Replaced => tracing::debug!(owner = %identity.owner, "personal info updated"),
    }
    Ok(Json(info))
}
