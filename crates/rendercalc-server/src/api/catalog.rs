use axum::{extract::State, Json};
use rendercalc_core::ProjectType;
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ProjectTypesResponse {
    currency: String,
    project_types: Vec<ProjectType>,
}

/// `GET /catalog/project-types`: the first wizard step's choices.
pub(super) async fn list_project_types(
    State(state): State<AppState>,
) -> Json<ProjectTypesResponse> {
    Json(ProjectTypesResponse {
        currency: state.catalog.currency.clone(),
        project_types: state.catalog.project_types.clone(),
    })
}
