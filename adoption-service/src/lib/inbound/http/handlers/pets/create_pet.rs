use auth::Principal;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::super::require_admin;
use super::super::ApiError;
use super::super::ApiSuccess;
use super::PetData;
use crate::domain::pet::models::CreatePetCommand;
use crate::domain::pet::ports::PetServicePort;
use crate::inbound::http::router::AppState;

pub async fn create_pet(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreatePetRequestBody>,
) -> Result<ApiSuccess<PetData>, ApiError> {
    require_admin(&principal)?;

    state
        .pet_service
        .create_pet(body.into_command())
        .await
        .map_err(ApiError::from)
        .map(|ref pet| ApiSuccess::new(StatusCode::CREATED, pet.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequestBody {
    name: String,
    kind: String,
    breed: String,
    age: i32,
    location: String,
    status: Option<String>,
}

impl CreatePetRequestBody {
    fn into_command(self) -> CreatePetCommand {
        CreatePetCommand {
            name: self.name,
            kind: self.kind,
            breed: self.breed,
            age: self.age,
            location: self.location,
            status: self.status,
        }
    }
}
