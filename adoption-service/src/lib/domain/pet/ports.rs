use async_trait::async_trait;

use crate::pet::errors::PetError;
use crate::pet::models::CreatePetCommand;
use crate::pet::models::Pet;
use crate::pet::models::PetId;
use crate::pet::models::PetStatus;
use crate::pet::models::UpdatePetCommand;

/// Port for pet domain service operations.
#[async_trait]
pub trait PetServicePort: Send + Sync + 'static {
    /// Add a new pet to the store.
    ///
    /// # Errors
    /// * `InvalidName` / `InvalidKind` / `InvalidLocation` / `InvalidAge` -
    ///   field validation
    /// * `InvalidInitialStatus` - explicit status other than AVAILABLE
    async fn create_pet(&self, command: CreatePetCommand) -> Result<Pet, PetError>;

    /// Retrieve a pet by identifier.
    ///
    /// # Errors
    /// * `NotFound` - pet does not exist
    async fn get_pet(&self, id: PetId) -> Result<Pet, PetError>;

    /// Retrieve every pet in the store.
    async fn list_pets(&self) -> Result<Vec<Pet>, PetError>;

    /// Retrieve only the pets currently open for adoption.
    async fn list_available_pets(&self) -> Result<Vec<Pet>, PetError>;

    /// Replace a pet's details.
    ///
    /// # Errors
    /// * `NotFound` - pet does not exist
    async fn update_pet(&self, id: PetId, command: UpdatePetCommand) -> Result<Pet, PetError>;

    /// Delete a pet.
    ///
    /// # Errors
    /// * `NotFound` - pet does not exist
    async fn delete_pet(&self, id: PetId) -> Result<(), PetError>;
}

/// Persistence operations for the pet aggregate.
#[async_trait]
pub trait PetRepository: Send + Sync + 'static {
    /// Persist a new pet, letting the store assign the identifier.
    async fn create(&self, pet: Pet) -> Result<Pet, PetError>;

    async fn find_by_id(&self, id: PetId) -> Result<Option<Pet>, PetError>;

    async fn find_by_status(&self, status: PetStatus) -> Result<Vec<Pet>, PetError>;

    async fn list_all(&self) -> Result<Vec<Pet>, PetError>;

    /// Update an existing pet record.
    ///
    /// # Errors
    /// * `NotFound` - pet does not exist
    async fn update(&self, pet: Pet) -> Result<Pet, PetError>;

    /// Remove a pet record.
    ///
    /// # Errors
    /// * `NotFound` - pet does not exist
    async fn delete(&self, id: PetId) -> Result<(), PetError>;
}
