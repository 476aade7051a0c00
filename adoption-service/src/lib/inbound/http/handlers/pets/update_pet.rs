use auth::Principal;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::super::require_admin;
use super::super::ApiError;
use super::super::ApiSuccess;
use super::PetData;
use crate::domain::pet::models::UpdatePetCommand;
use crate::domain::pet::ports::PetServicePort;
use crate::inbound::http::router::AppState;
use crate::pet::models::PetId;

pub async fn update_pet(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(pet_id): Path<i64>,
    Json(body): Json<UpdatePetRequestBody>,
) -> Result<ApiSuccess<PetData>, ApiError> {
    require_admin(&principal)?;

    state
        .pet_service
        .update_pet(PetId(pet_id), body.into_command())
        .await
        .map_err(ApiError::from)
        .map(|ref pet| ApiSuccess::new(StatusCode::OK, pet.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePetRequestBody {
    name: String,
    kind: String,
    breed: String,
    age: i32,
    location: String,
    status: String,
}

impl UpdatePetRequestBody {
    fn into_command(self) -> UpdatePetCommand {
        UpdatePetCommand {
            name: self.name,
            kind: self.kind,
            breed: self.breed,
            age: self.age,
            location: self.location,
            status: self.status,
        }
    }
}
