use auth::Principal;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::super::ApiError;
use super::super::ApiSuccess;
use super::PetData;
use crate::domain::pet::ports::PetServicePort;
use crate::inbound::http::router::AppState;

/// Administrators see the whole catalog; everyone else sees only pets still
/// open for adoption.
pub async fn list_pets(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<Vec<PetData>>, ApiError> {
    let pets = if principal.is_admin() {
        state.pet_service.list_pets().await?
    } else {
        state.pet_service.list_available_pets().await?
    };

    Ok(ApiSuccess::new(
        StatusCode::OK,
        pets.iter().map(PetData::from).collect(),
    ))
}
