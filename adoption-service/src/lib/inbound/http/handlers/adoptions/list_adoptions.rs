use auth::Principal;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::super::require_admin;
use super::super::ApiError;
use super::super::ApiSuccess;
use super::AdoptionData;
use crate::domain::adoption::ports::AdoptionServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_adoptions(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<Vec<AdoptionData>>, ApiError> {
    require_admin(&principal)?;

    state
        .adoption_service
        .list_all()
        .await
        .map_err(ApiError::from)
        .map(|adoptions| {
            ApiSuccess::new(
                StatusCode::OK,
                adoptions.iter().map(AdoptionData::from).collect(),
            )
        })
}
