use std::sync::Arc;

use async_trait::async_trait;
use auth::Principal;
use chrono::Utc;

use crate::adoption::access;
use crate::adoption::errors::AdoptionError;
use crate::adoption::models::Adoption;
use crate::adoption::models::AdoptionCommand;
use crate::adoption::models::AdoptionId;
use crate::adoption::models::AdoptionStatus;
use crate::adoption::models::NewAdoption;
use crate::adoption::ports::AdoptionRepository;
use crate::adoption::ports::AdoptionServicePort;
use crate::pet::models::Pet;
use crate::pet::models::PetId;
use crate::pet::models::PetStatus;
use crate::pet::ports::PetRepository;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::ports::UserRepository;

/// Orchestrates the adoption workflow.
///
/// Decisions (approve/reject) pair the adoption status flip with the pet
/// status flip; the repository applies both in one transaction so no
/// intermediate state is observable.
pub struct AdoptionService<AR, UR, PR>
where
    AR: AdoptionRepository,
    UR: UserRepository,
    PR: PetRepository,
{
    adoptions: Arc<AR>,
    users: Arc<UR>,
    pets: Arc<PR>,
}

impl<AR, UR, PR> AdoptionService<AR, UR, PR>
where
    AR: AdoptionRepository,
    UR: UserRepository,
    PR: PetRepository,
{
    pub fn new(adoptions: Arc<AR>, users: Arc<UR>, pets: Arc<PR>) -> Self {
        Self {
            adoptions,
            users,
            pets,
        }
    }

    /// Validate identifiers and status text, then resolve both references.
    async fn resolve_command(
        &self,
        command: &AdoptionCommand,
    ) -> Result<(User, Pet, AdoptionStatus), AdoptionError> {
        if command.user_id < 0 {
            return Err(AdoptionError::InvalidUserId(command.user_id));
        }
        if command.pet_id < 0 {
            return Err(AdoptionError::InvalidPetId(command.pet_id));
        }
        let status = AdoptionStatus::new(command.status.clone())?;

        let user = self
            .users
            .find_by_id(UserId(command.user_id))
            .await
            .map_err(|e| AdoptionError::DatabaseError(e.to_string()))?
            .ok_or(AdoptionError::UserNotFound(command.user_id))?;

        let pet = self
            .pets
            .find_by_id(PetId(command.pet_id))
            .await
            .map_err(|e| AdoptionError::DatabaseError(e.to_string()))?
            .ok_or(AdoptionError::PetNotFound(command.pet_id))?;

        Ok((user, pet, status))
    }

    async fn load(&self, id: AdoptionId) -> Result<Adoption, AdoptionError> {
        self.adoptions
            .find_by_id(id)
            .await?
            .ok_or(AdoptionError::NotFound(id.0))
    }

    /// Shared approve/reject path: load, refuse terminal states, then hand
    /// the paired write to the repository.
    async fn decide(
        &self,
        id: AdoptionId,
        status: AdoptionStatus,
        pet_status: PetStatus,
        require_pet_available: bool,
    ) -> Result<Adoption, AdoptionError> {
        let mut adoption = self.load(id).await?;

        if adoption.status.is_terminal() {
            return Err(AdoptionError::AlreadyDecided {
                id: id.0,
                status: adoption.status.to_string(),
            });
        }

        adoption.status = status;
        let decided = self
            .adoptions
            .decide(&adoption, pet_status, require_pet_available)
            .await?;

        tracing::info!(
            adoption_id = %decided.id,
            status = %decided.status,
            pet_id = %decided.pet.id,
            pet_status = %decided.pet.status,
            "Decided adoption"
        );
        Ok(decided)
    }
}

#[async_trait]
impl<AR, UR, PR> AdoptionServicePort for AdoptionService<AR, UR, PR>
where
    AR: AdoptionRepository,
    UR: UserRepository,
    PR: PetRepository,
{
    async fn create(&self, command: AdoptionCommand) -> Result<Adoption, AdoptionError> {
        let (user, pet, status) = self.resolve_command(&command).await?;
        let adoption_date = command.adoption_date.unwrap_or_else(Utc::now);

        let created = self
            .adoptions
            .create(NewAdoption {
                user,
                pet,
                status,
                adoption_date,
            })
            .await?;

        tracing::info!(
            adoption_id = %created.id,
            user_id = %created.user.id,
            pet_id = %created.pet.id,
            "Created adoption"
        );
        Ok(created)
    }

    async fn get_by_id(
        &self,
        id: AdoptionId,
        principal: &Principal,
    ) -> Result<Adoption, AdoptionError> {
        let adoption = self.load(id).await?;
        if !access::permits(principal, &adoption) {
            return Err(AdoptionError::AccessDenied);
        }
        Ok(adoption)
    }

    async fn list_all(&self) -> Result<Vec<Adoption>, AdoptionError> {
        let adoptions = self.adoptions.list_all().await?;
        tracing::info!(count = adoptions.len(), "Retrieved adoptions");
        Ok(adoptions)
    }

    async fn update(
        &self,
        id: AdoptionId,
        command: AdoptionCommand,
    ) -> Result<Adoption, AdoptionError> {
        let (user, pet, status) = self.resolve_command(&command).await?;

        let mut adoption = self.load(id).await?;
        adoption.user = user;
        adoption.pet = pet;
        adoption.status = status;
        if let Some(date) = command.adoption_date {
            adoption.adoption_date = date;
        }

        let updated = self.adoptions.update(adoption).await?;
        tracing::info!(adoption_id = %updated.id, "Updated adoption");
        Ok(updated)
    }

    async fn delete(&self, id: AdoptionId) -> Result<(), AdoptionError> {
        self.adoptions.delete(id).await?;
        tracing::info!(adoption_id = %id, "Deleted adoption");
        Ok(())
    }

    async fn approve(&self, id: AdoptionId) -> Result<Adoption, AdoptionError> {
        self.decide(id, AdoptionStatus::approved(), PetStatus::Adopted, true)
            .await
    }

    async fn reject(&self, id: AdoptionId) -> Result<Adoption, AdoptionError> {
        self.decide(id, AdoptionStatus::rejected(), PetStatus::Available, false)
            .await
    }
}

#[cfg(test)]
mod tests {
    use auth::Role;
    use chrono::TimeZone;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::pet::errors::PetError;
    use crate::pet::models::PetKind;
    use crate::user::errors::UserError;
    use crate::user::models::EmailAddress;
    use crate::user::models::Username;

    mock! {
        pub TestAdoptionRepository {}

        #[async_trait]
        impl AdoptionRepository for TestAdoptionRepository {
            async fn create(&self, adoption: NewAdoption) -> Result<Adoption, AdoptionError>;
            async fn find_by_id(&self, id: AdoptionId) -> Result<Option<Adoption>, AdoptionError>;
            async fn list_all(&self) -> Result<Vec<Adoption>, AdoptionError>;
            async fn update(&self, adoption: Adoption) -> Result<Adoption, AdoptionError>;
            async fn delete(&self, id: AdoptionId) -> Result<(), AdoptionError>;
            async fn decide(
                &self,
                adoption: &Adoption,
                pet_status: PetStatus,
                require_pet_available: bool,
            ) -> Result<Adoption, AdoptionError>;
        }
    }

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn delete(&self, id: UserId) -> Result<(), UserError>;
        }
    }

    mock! {
        pub TestPetRepository {}

        #[async_trait]
        impl PetRepository for TestPetRepository {
            async fn create(&self, pet: Pet) -> Result<Pet, PetError>;
            async fn find_by_id(&self, id: PetId) -> Result<Option<Pet>, PetError>;
            async fn find_by_status(&self, status: PetStatus) -> Result<Vec<Pet>, PetError>;
            async fn list_all(&self) -> Result<Vec<Pet>, PetError>;
            async fn update(&self, pet: Pet) -> Result<Pet, PetError>;
            async fn delete(&self, id: PetId) -> Result<(), PetError>;
        }
    }

    fn sample_user(username: &str) -> User {
        User {
            id: UserId(1),
            username: Username::new(username.to_string()).unwrap(),
            name: "Alice Doe".to_string(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            phone: "555-0101".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            roles: vec![Role::User],
        }
    }

    fn sample_pet(status: PetStatus) -> Pet {
        Pet {
            id: PetId(2),
            name: "Rex".to_string(),
            kind: PetKind {
                id: 1,
                name: "Dog".to_string(),
            },
            breed: "Labrador".to_string(),
            age: 3,
            location: "Springfield".to_string(),
            status,
            created_at: Utc::now(),
        }
    }

    fn sample_adoption(status: AdoptionStatus) -> Adoption {
        Adoption {
            id: AdoptionId(9),
            user: sample_user("alice"),
            pet: sample_pet(PetStatus::Available),
            status,
            adoption_date: Utc::now(),
        }
    }

    fn command() -> AdoptionCommand {
        AdoptionCommand {
            user_id: 1,
            pet_id: 2,
            status: AdoptionStatus::PENDING.to_string(),
            adoption_date: None,
        }
    }

    fn service(
        adoptions: MockTestAdoptionRepository,
        users: MockTestUserRepository,
        pets: MockTestPetRepository,
    ) -> AdoptionService<MockTestAdoptionRepository, MockTestUserRepository, MockTestPetRepository>
    {
        AdoptionService::new(Arc::new(adoptions), Arc::new(users), Arc::new(pets))
    }

    fn resolving_repos() -> (MockTestUserRepository, MockTestPetRepository) {
        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(sample_user("alice"))));
        let mut pets = MockTestPetRepository::new();
        pets.expect_find_by_id()
            .returning(|_| Ok(Some(sample_pet(PetStatus::Available))));
        (users, pets)
    }

    #[tokio::test]
    async fn test_create_stamps_adoption_date_when_unset() {
        let (users, pets) = resolving_repos();
        let mut adoptions = MockTestAdoptionRepository::new();
        let before = Utc::now();
        adoptions
            .expect_create()
            .withf(move |new| new.adoption_date >= before)
            .times(1)
            .returning(|new| {
                Ok(Adoption {
                    id: AdoptionId(9),
                    user: new.user,
                    pet: new.pet,
                    status: new.status,
                    adoption_date: new.adoption_date,
                })
            });

        let created = service(adoptions, users, pets)
            .create(command())
            .await
            .unwrap();

        assert_eq!(created.id, AdoptionId(9));
        assert_eq!(created.status.as_str(), AdoptionStatus::PENDING);
    }

    #[tokio::test]
    async fn test_create_keeps_supplied_adoption_date() {
        let (users, pets) = resolving_repos();
        let supplied = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut adoptions = MockTestAdoptionRepository::new();
        adoptions
            .expect_create()
            .withf(move |new| new.adoption_date == supplied)
            .times(1)
            .returning(|new| {
                Ok(Adoption {
                    id: AdoptionId(9),
                    user: new.user,
                    pet: new.pet,
                    status: new.status,
                    adoption_date: new.adoption_date,
                })
            });

        let mut cmd = command();
        cmd.adoption_date = Some(supplied);

        let created = service(adoptions, users, pets).create(cmd).await.unwrap();
        assert_eq!(created.adoption_date, supplied);
    }

    #[tokio::test]
    async fn test_create_rejects_negative_user_id() {
        let adoptions = MockTestAdoptionRepository::new();
        let users = MockTestUserRepository::new();
        let pets = MockTestPetRepository::new();

        let mut cmd = command();
        cmd.user_id = -1;

        let result = service(adoptions, users, pets).create(cmd).await;
        assert!(matches!(result.unwrap_err(), AdoptionError::InvalidUserId(-1)));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_status() {
        let adoptions = MockTestAdoptionRepository::new();
        let users = MockTestUserRepository::new();
        let pets = MockTestPetRepository::new();

        let mut cmd = command();
        cmd.status = "  ".to_string();

        let result = service(adoptions, users, pets).create(cmd).await;
        assert!(matches!(result.unwrap_err(), AdoptionError::InvalidStatus(_)));
    }

    #[tokio::test]
    async fn test_create_fails_when_pet_missing() {
        let adoptions = MockTestAdoptionRepository::new();
        let mut users = MockTestUserRepository::new();
        users
            .expect_find_by_id()
            .returning(|_| Ok(Some(sample_user("alice"))));
        let mut pets = MockTestPetRepository::new();
        pets.expect_find_by_id().returning(|_| Ok(None));

        let result = service(adoptions, users, pets).create(command()).await;
        assert!(matches!(result.unwrap_err(), AdoptionError::PetNotFound(2)));
    }

    #[tokio::test]
    async fn test_get_by_id_allows_owner() {
        let mut adoptions = MockTestAdoptionRepository::new();
        adoptions
            .expect_find_by_id()
            .with(eq(AdoptionId(9)))
            .times(1)
            .returning(|_| Ok(Some(sample_adoption(AdoptionStatus::pending()))));

        let principal = Principal::new("alice".to_string(), vec![Role::User]);
        let adoption = service(
            adoptions,
            MockTestUserRepository::new(),
            MockTestPetRepository::new(),
        )
        .get_by_id(AdoptionId(9), &principal)
        .await
        .unwrap();

        assert_eq!(adoption.id, AdoptionId(9));
    }

    #[tokio::test]
    async fn test_get_by_id_denies_unrelated_user() {
        let mut adoptions = MockTestAdoptionRepository::new();
        adoptions
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(sample_adoption(AdoptionStatus::pending()))));

        let principal = Principal::new("mallory".to_string(), vec![Role::User]);
        let result = service(
            adoptions,
            MockTestUserRepository::new(),
            MockTestPetRepository::new(),
        )
        .get_by_id(AdoptionId(9), &principal)
        .await;

        assert!(matches!(result.unwrap_err(), AdoptionError::AccessDenied));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_before_access_check() {
        let mut adoptions = MockTestAdoptionRepository::new();
        adoptions
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let principal = Principal::new("mallory".to_string(), vec![Role::User]);
        let result = service(
            adoptions,
            MockTestUserRepository::new(),
            MockTestPetRepository::new(),
        )
        .get_by_id(AdoptionId(9), &principal)
        .await;

        assert!(matches!(result.unwrap_err(), AdoptionError::NotFound(9)));
    }

    #[tokio::test]
    async fn test_update_missing_adoption_is_not_found() {
        let (users, pets) = resolving_repos();
        let mut adoptions = MockTestAdoptionRepository::new();
        adoptions
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let result = service(adoptions, users, pets)
            .update(AdoptionId(42), command())
            .await;

        assert!(matches!(result.unwrap_err(), AdoptionError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_approve_marks_pet_adopted_with_guard() {
        let mut adoptions = MockTestAdoptionRepository::new();
        adoptions
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(sample_adoption(AdoptionStatus::pending()))));
        adoptions
            .expect_decide()
            .withf(|adoption, pet_status, require_available| {
                adoption.status.as_str() == AdoptionStatus::APPROVED
                    && *pet_status == PetStatus::Adopted
                    && *require_available
            })
            .times(1)
            .returning(|adoption, pet_status, _| {
                let mut decided = adoption.clone();
                decided.pet.status = pet_status;
                Ok(decided)
            });

        let decided = service(
            adoptions,
            MockTestUserRepository::new(),
            MockTestPetRepository::new(),
        )
        .approve(AdoptionId(9))
        .await
        .unwrap();

        assert_eq!(decided.status.as_str(), AdoptionStatus::APPROVED);
        assert_eq!(decided.pet.status, PetStatus::Adopted);
    }

    #[tokio::test]
    async fn test_reject_returns_pet_to_available_without_guard() {
        let mut adoptions = MockTestAdoptionRepository::new();
        adoptions
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(sample_adoption(AdoptionStatus::pending()))));
        adoptions
            .expect_decide()
            .withf(|adoption, pet_status, require_available| {
                adoption.status.as_str() == AdoptionStatus::REJECTED
                    && *pet_status == PetStatus::Available
                    && !*require_available
            })
            .times(1)
            .returning(|adoption, pet_status, _| {
                let mut decided = adoption.clone();
                decided.pet.status = pet_status;
                Ok(decided)
            });

        let decided = service(
            adoptions,
            MockTestUserRepository::new(),
            MockTestPetRepository::new(),
        )
        .reject(AdoptionId(9))
        .await
        .unwrap();

        assert_eq!(decided.status.as_str(), AdoptionStatus::REJECTED);
        assert_eq!(decided.pet.status, PetStatus::Available);
    }

    #[tokio::test]
    async fn test_approve_refuses_already_decided_adoption() {
        let mut adoptions = MockTestAdoptionRepository::new();
        adoptions
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(sample_adoption(AdoptionStatus::rejected()))));

        let result = service(
            adoptions,
            MockTestUserRepository::new(),
            MockTestPetRepository::new(),
        )
        .approve(AdoptionId(9))
        .await;

        assert!(matches!(
            result.unwrap_err(),
            AdoptionError::AlreadyDecided { id: 9, .. }
        ));
    }

    #[tokio::test]
    async fn test_approve_surfaces_pet_contention() {
        let mut adoptions = MockTestAdoptionRepository::new();
        adoptions
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(sample_adoption(AdoptionStatus::pending()))));
        adoptions
            .expect_decide()
            .times(1)
            .returning(|adoption, _, _| Err(AdoptionError::PetUnavailable(adoption.pet.id.0)));

        let result = service(
            adoptions,
            MockTestUserRepository::new(),
            MockTestPetRepository::new(),
        )
        .approve(AdoptionId(9))
        .await;

        assert!(matches!(result.unwrap_err(), AdoptionError::PetUnavailable(2)));
    }
}
