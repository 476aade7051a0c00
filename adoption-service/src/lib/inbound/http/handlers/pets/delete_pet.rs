use auth::Principal;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::super::require_admin;
use super::super::ApiError;
use crate::domain::pet::ports::PetServicePort;
use crate::inbound::http::router::AppState;
use crate::pet::models::PetId;

pub async fn delete_pet(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(pet_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_admin(&principal)?;

    state
        .pet_service
        .delete_pet(PetId(pet_id))
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
