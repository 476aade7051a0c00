use auth::Principal;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::super::require_admin;
use super::super::ApiError;
use super::super::ApiSuccess;
use super::PetData;
use crate::domain::pet::ports::PetServicePort;
use crate::inbound::http::router::AppState;
use crate::pet::models::PetId;

pub async fn get_pet(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(pet_id): Path<i64>,
) -> Result<ApiSuccess<PetData>, ApiError> {
    require_admin(&principal)?;

    state
        .pet_service
        .get_pet(PetId(pet_id))
        .await
        .map_err(ApiError::from)
        .map(|ref pet| ApiSuccess::new(StatusCode::OK, pet.into()))
}
