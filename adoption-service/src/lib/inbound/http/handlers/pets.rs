use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::pet::models::Pet;

pub mod create_pet;
pub mod delete_pet;
pub mod get_pet;
pub mod list_pets;
pub mod update_pet;

/// Pet representation shared by pet and adoption payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetData {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub breed: String,
    pub age: i32,
    pub location: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Pet> for PetData {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id.0,
            name: pet.name.clone(),
            kind: pet.kind.name.clone(),
            breed: pet.breed.clone(),
            age: pet.age,
            location: pet.location.clone(),
            status: pet.status.to_string(),
            created_at: pet.created_at,
        }
    }
}
