use async_trait::async_trait;

use crate::user::errors::UserError;
use crate::user::models::RegisterUserCommand;
use crate::user::models::UpdateUserCommand;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::models::Username;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user, assigning roles from the optional admin key.
    ///
    /// # Errors
    /// * `InvalidName` / `InvalidPhone` / `PasswordTooShort` - field validation
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - uniqueness violation
    /// * `DatabaseError` - storage operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Verify username/password credentials.
    ///
    /// # Errors
    /// * `InvalidCredentials` - unknown username or wrong password
    /// * `NoRolesAssigned` - stored record carries no roles
    async fn authenticate(&self, username: &Username, password: &str) -> Result<User, UserError>;

    /// Retrieve a user by identifier.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    async fn get_user(&self, id: UserId) -> Result<User, UserError>;

    /// Retrieve every registered user.
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Update a user's profile (name, email, phone only).
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    async fn update_profile(
        &self,
        id: UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError>;

    /// Delete a user.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    async fn delete_user(&self, id: UserId) -> Result<(), UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user, letting the store assign the identifier.
    async fn create(&self, user: User) -> Result<User, UserError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Update an existing user record.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Remove a user record.
    ///
    /// # Errors
    /// * `NotFound` - user does not exist
    async fn delete(&self, id: UserId) -> Result<(), UserError>;
}
