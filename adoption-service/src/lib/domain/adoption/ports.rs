use async_trait::async_trait;
use auth::Principal;

use crate::adoption::errors::AdoptionError;
use crate::adoption::models::Adoption;
use crate::adoption::models::AdoptionCommand;
use crate::adoption::models::AdoptionId;
use crate::adoption::models::NewAdoption;
use crate::pet::models::PetStatus;

/// Port for the adoption workflow.
#[async_trait]
pub trait AdoptionServicePort: Send + Sync + 'static {
    /// Create a new adoption request.
    ///
    /// # Errors
    /// * `InvalidUserId` / `InvalidPetId` / `InvalidStatus` - field validation
    /// * `UserNotFound` / `PetNotFound` - referenced record absent
    async fn create(&self, command: AdoptionCommand) -> Result<Adoption, AdoptionError>;

    /// Retrieve an adoption, enforcing the owner-or-administrator rule.
    ///
    /// # Errors
    /// * `NotFound` - adoption does not exist
    /// * `AccessDenied` - principal is neither owner nor administrator
    async fn get_by_id(
        &self,
        id: AdoptionId,
        principal: &Principal,
    ) -> Result<Adoption, AdoptionError>;

    /// Retrieve every adoption request, unfiltered.
    async fn list_all(&self) -> Result<Vec<Adoption>, AdoptionError>;

    /// Replace an existing adoption's user/pet/status fields.
    ///
    /// # Errors
    /// * `NotFound` - adoption does not exist (no record is created)
    async fn update(
        &self,
        id: AdoptionId,
        command: AdoptionCommand,
    ) -> Result<Adoption, AdoptionError>;

    /// Delete an adoption request.
    ///
    /// # Errors
    /// * `NotFound` - adoption does not exist
    async fn delete(&self, id: AdoptionId) -> Result<(), AdoptionError>;

    /// Approve a pending adoption, marking its pet ADOPTED.
    ///
    /// # Errors
    /// * `NotFound` - adoption does not exist
    /// * `AlreadyDecided` - adoption is in a terminal state
    /// * `PetUnavailable` - the pet was claimed by another approval
    async fn approve(&self, id: AdoptionId) -> Result<Adoption, AdoptionError>;

    /// Reject a pending adoption, returning its pet to AVAILABLE.
    ///
    /// # Errors
    /// * `NotFound` - adoption does not exist
    /// * `AlreadyDecided` - adoption is in a terminal state
    async fn reject(&self, id: AdoptionId) -> Result<Adoption, AdoptionError>;
}

/// Persistence operations for the adoption aggregate.
///
/// All reads load the owning user and pet eagerly; the workflow's access
/// rule and decision writes need both on every path.
#[async_trait]
pub trait AdoptionRepository: Send + Sync + 'static {
    /// Persist a new adoption, letting the store assign the identifier.
    async fn create(&self, adoption: NewAdoption) -> Result<Adoption, AdoptionError>;

    async fn find_by_id(&self, id: AdoptionId) -> Result<Option<Adoption>, AdoptionError>;

    async fn list_all(&self) -> Result<Vec<Adoption>, AdoptionError>;

    /// Update an existing adoption record.
    ///
    /// # Errors
    /// * `NotFound` - adoption does not exist
    async fn update(&self, adoption: Adoption) -> Result<Adoption, AdoptionError>;

    /// Remove an adoption record.
    ///
    /// # Errors
    /// * `NotFound` - adoption does not exist
    async fn delete(&self, id: AdoptionId) -> Result<(), AdoptionError>;

    /// Apply a decision: write the adoption's new status and its pet's new
    /// status inside a single transaction.
    ///
    /// When `require_pet_available` is set the pet write is guarded on the
    /// pet still being AVAILABLE; a concurrent claim makes the whole
    /// transaction roll back.
    ///
    /// # Errors
    /// * `NotFound` - adoption vanished between read and write
    /// * `PetUnavailable` - guard failed, nothing was applied
    async fn decide(
        &self,
        adoption: &Adoption,
        pet_status: PetStatus,
        require_pet_available: bool,
    ) -> Result<Adoption, AdoptionError>;
}
