use crate::error::ServerResult;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use portfolio_store::{Experience, OwnerId, PersonalInfo, Project, Skill};
use serde::Serialize;

/// Everything a visitor sees for one owner
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub personal_info: Option<PersonalInfo>,
    pub projects: Vec<Project>,
    pub experience: Vec<Experience>,
    pub skills: Vec<Skill>,
}

/// GET /api/portfolio/{user_id}
///
/// An unknown owner gets the empty aggregate, not a 404.
pub async fn get_portfolio(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ServerResult<Json<PortfolioResponse>> {
    let owner = OwnerId::from(user_id);

    let (personal_info, projects, experience, skills) = tokio::try_join!(
        state.personal_info.find_one(&owner),
        state.projects.list(&owner),
        state.experience.list(&owner),
        state.skills.list(&owner),
    )?;

    Ok(Json(PortfolioResponse {
        personal_info,
        projects,
        experience,
        skills,
    }))
}
