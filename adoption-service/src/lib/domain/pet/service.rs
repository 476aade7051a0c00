use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::pet::errors::PetError;
use crate::pet::models::CreatePetCommand;
use crate::pet::models::Pet;
use crate::pet::models::PetId;
use crate::pet::models::PetKind;
use crate::pet::models::PetStatus;
use crate::pet::models::UpdatePetCommand;
use crate::pet::ports::PetRepository;
use crate::pet::ports::PetServicePort;

/// Domain service for managing the pet catalog.
pub struct PetService<PR>
where
    PR: PetRepository,
{
    repository: Arc<PR>,
}

impl<PR> PetService<PR>
where
    PR: PetRepository,
{
    pub fn new(repository: Arc<PR>) -> Self {
        Self { repository }
    }

    fn validate_fields(name: &str, kind: &str, location: &str, age: i32) -> Result<(), PetError> {
        if name.trim().is_empty() {
            return Err(PetError::InvalidName);
        }
        if kind.trim().is_empty() {
            return Err(PetError::InvalidKind);
        }
        if location.trim().is_empty() {
            return Err(PetError::InvalidLocation);
        }
        if age < 0 {
            return Err(PetError::InvalidAge);
        }
        Ok(())
    }
}

#[async_trait]
impl<PR> PetServicePort for PetService<PR>
where
    PR: PetRepository,
{
    async fn create_pet(&self, command: CreatePetCommand) -> Result<Pet, PetError> {
        Self::validate_fields(&command.name, &command.kind, &command.location, command.age)?;

        // New pets always enter the catalog adoptable; an explicit status is
        // accepted only when it says so.
        if let Some(status) = &command.status {
            if PetStatus::from_str(status)? != PetStatus::Available {
                return Err(PetError::InvalidInitialStatus(status.clone()));
            }
        }

        let pet = Pet {
            id: PetId(0),
            name: command.name,
            kind: PetKind {
                id: 0,
                name: command.kind,
            },
            breed: command.breed,
            age: command.age,
            location: command.location,
            status: PetStatus::Available,
            created_at: Utc::now(),
        };

        let created = self.repository.create(pet).await?;
        tracing::info!(pet_id = %created.id, name = %created.name, "Created pet");
        Ok(created)
    }

    async fn get_pet(&self, id: PetId) -> Result<Pet, PetError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(PetError::NotFound(id.0))
    }

    async fn list_pets(&self) -> Result<Vec<Pet>, PetError> {
        let pets = self.repository.list_all().await?;
        tracing::info!(count = pets.len(), "Retrieved pets");
        Ok(pets)
    }

    async fn list_available_pets(&self) -> Result<Vec<Pet>, PetError> {
        self.repository.find_by_status(PetStatus::Available).await
    }

    async fn update_pet(&self, id: PetId, command: UpdatePetCommand) -> Result<Pet, PetError> {
        Self::validate_fields(&command.name, &command.kind, &command.location, command.age)?;
        let status = PetStatus::from_str(&command.status)?;

        let mut pet = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(PetError::NotFound(id.0))?;

        pet.name = command.name;
        pet.kind = PetKind {
            id: 0,
            name: command.kind,
        };
        pet.breed = command.breed;
        pet.age = command.age;
        pet.location = command.location;
        pet.status = status;

        let updated = self.repository.update(pet).await?;
        tracing::info!(pet_id = %updated.id, "Updated pet");
        Ok(updated)
    }

    async fn delete_pet(&self, id: PetId) -> Result<(), PetError> {
        self.repository.delete(id).await?;
        tracing::info!(pet_id = %id, "Deleted pet");
        Ok(())
    }
}
