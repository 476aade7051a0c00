use auth::Principal;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::super::require_admin;
use super::super::ApiError;
use super::super::ApiSuccess;
use super::AdoptionData;
use crate::adoption::models::AdoptionId;
use crate::domain::adoption::ports::AdoptionServicePort;
use crate::inbound::http::router::AppState;

pub async fn approve_adoption(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(adoption_id): Path<i64>,
) -> Result<ApiSuccess<AdoptionData>, ApiError> {
    require_admin(&principal)?;

    state
        .adoption_service
        .approve(AdoptionId(adoption_id))
        .await
        .map_err(ApiError::from)
        .map(|ref adoption| ApiSuccess::new(StatusCode::OK, adoption.into()))
}
