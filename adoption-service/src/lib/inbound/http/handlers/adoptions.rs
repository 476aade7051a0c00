use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::pets::PetData;
use super::users::UserData;
use crate::adoption::models::Adoption;
use crate::adoption::models::AdoptionCommand;

pub mod approve_adoption;
pub mod create_adoption;
pub mod delete_adoption;
pub mod get_adoption;
pub mod list_adoptions;
pub mod reject_adoption;
pub mod update_adoption;

/// Adoption representation with its owner and pet resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionData {
    pub id: i64,
    pub user: UserData,
    pub pet: PetData,
    pub status: String,
    pub adoption_date: DateTime<Utc>,
}

impl From<&Adoption> for AdoptionData {
    fn from(adoption: &Adoption) -> Self {
        Self {
            id: adoption.id.0,
            user: (&adoption.user).into(),
            pet: (&adoption.pet).into(),
            status: adoption.status.to_string(),
            adoption_date: adoption.adoption_date,
        }
    }
}

/// Request body shared by create and update. A missing `status` is treated
/// as blank so the workflow's own validation reports it; the service never
/// substitutes a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionRequestBody {
    pub user_id: i64,
    pub pet_id: i64,
    pub status: Option<String>,
    pub adoption_date: Option<DateTime<Utc>>,
}

impl AdoptionRequestBody {
    pub fn into_command(self) -> AdoptionCommand {
        AdoptionCommand {
            user_id: self.user_id,
            pet_id: self.pet_id,
            status: self.status.unwrap_or_default(),
            adoption_date: self.adoption_date,
        }
    }
}
