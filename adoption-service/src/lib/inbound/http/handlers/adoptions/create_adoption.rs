use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::super::ApiError;
use super::super::ApiSuccess;
use super::AdoptionData;
use super::AdoptionRequestBody;
use crate::domain::adoption::ports::AdoptionServicePort;
use crate::inbound::http::router::AppState;

pub async fn create_adoption(
    State(state): State<AppState>,
    Extension(_principal): Extension<auth::Principal>,
    Json(body): Json<AdoptionRequestBody>,
) -> Result<ApiSuccess<AdoptionData>, ApiError> {
    state
        .adoption_service
        .create(body.into_command())
        .await
        .map_err(ApiError::from)
        .map(|ref adoption| ApiSuccess::new(StatusCode::CREATED, adoption.into()))
}
