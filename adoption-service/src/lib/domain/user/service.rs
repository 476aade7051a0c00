use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::Role;
use subtle::ConstantTimeEq;

use crate::user::errors::UserError;
use crate::user::models::RegisterUserCommand;
use crate::user::models::UpdateUserCommand;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::models::Username;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

const PASSWORD_MIN_LENGTH: usize = 8;

/// Domain service for user registration, authentication, and profile
/// management.
///
/// Role elevation happens only at registration: the caller-supplied admin
/// key is compared against the configured secret in constant time.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: PasswordHasher,
    admin_key: String,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, admin_key: String) -> Self {
        Self {
            repository,
            password_hasher: PasswordHasher::new(),
            admin_key,
        }
    }

    fn determine_roles(&self, admin_key: Option<&str>) -> Vec<Role> {
        match admin_key {
            Some(key) if bool::from(key.as_bytes().ct_eq(self.admin_key.as_bytes())) => {
                vec![Role::Admin]
            }
            _ => vec![Role::User],
        }
    }

    fn validate_profile_fields(name: &str, phone: &str) -> Result<(), UserError> {
        if name.trim().is_empty() {
            return Err(UserError::InvalidName);
        }
        if phone.trim().is_empty() {
            return Err(UserError::InvalidPhone);
        }
        Ok(())
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        Self::validate_profile_fields(&command.name, &command.phone)?;
        if command.password.len() < PASSWORD_MIN_LENGTH {
            return Err(UserError::PasswordTooShort {
                min: PASSWORD_MIN_LENGTH,
            });
        }

        let roles = self.determine_roles(command.admin_key.as_deref());
        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = User {
            // Store assigns the real identifier on insert
            id: UserId(0),
            username: command.username,
            name: command.name,
            email: command.email,
            phone: command.phone,
            password_hash,
            roles,
        };

        let created = self.repository.create(user).await?;
        tracing::info!(user_id = %created.id, username = %created.username, "Created user");
        Ok(created)
    }

    async fn authenticate(&self, username: &Username, password: &str) -> Result<User, UserError> {
        let user = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !self.password_hasher.verify(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        if user.roles.is_empty() {
            return Err(UserError::NoRolesAssigned);
        }

        tracing::info!(username = %user.username, roles = ?user.roles, "Authenticated user");
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.0))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        let users = self.repository.list_all().await?;
        tracing::info!(count = users.len(), "Retrieved users");
        Ok(users)
    }

    async fn update_profile(
        &self,
        id: UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        Self::validate_profile_fields(&command.name, &command.phone)?;

        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.0))?;

        user.name = command.name;
        user.email = command.email;
        user.phone = command.phone;

        let updated = self.repository.update(user).await?;
        tracing::info!(user_id = %updated.id, "Updated user");
        Ok(updated)
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::user::models::EmailAddress;

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

    fn register_command(admin_key: Option<&str>) -> RegisterUserCommand {
        RegisterUserCommand {
            username: Username::new("alice".to_string()).unwrap(),
            password: "pass_word!".to_string(),
            name: "Alice Doe".to_string(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            phone: "555-0101".to_string(),
            admin_key: admin_key.map(String::from),
        }
    }

    fn service(repository: MockTestUserRepository) -> UserService<MockTestUserRepository> {
        UserService::new(Arc::new(repository), "s3cret-admin-key".to_string())
    }

    fn stored_user(password: &str, roles: Vec<Role>) -> User {
        let hash = PasswordHasher::new().hash(password).unwrap();
        User {
            id: UserId(7),
            username: Username::new("alice".to_string()).unwrap(),
            name: "Alice Doe".to_string(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            phone: "555-0101".to_string(),
            password_hash: hash,
            roles,
        }
    }

    #[tokio::test]
    async fn test_register_without_admin_key_yields_user_role() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_create()
            .withf(|user| {
                user.roles == vec![Role::User] && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|mut user| {
                user.id = UserId(1);
                Ok(user)
            });

        let created = service(repository)
            .register(register_command(None))
            .await
            .unwrap();

        assert_eq!(created.id, UserId(1));
        assert_eq!(created.roles, vec![Role::User]);
    }

    #[tokio::test]
    async fn test_register_with_matching_admin_key_yields_admin_role() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_create()
            .withf(|user| user.roles == vec![Role::Admin])
            .times(1)
            .returning(|mut user| {
                user.id = UserId(1);
                Ok(user)
            });

        let created = service(repository)
            .register(register_command(Some("s3cret-admin-key")))
            .await
            .unwrap();

        assert!(created.roles.contains(&Role::Admin));
    }

    #[tokio::test]
    async fn test_register_with_wrong_admin_key_yields_user_role() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_create()
            .withf(|user| user.roles == vec![Role::User])
            .times(1)
            .returning(|user| Ok(user));

        let created = service(repository)
            .register(register_command(Some("guessed-key")))
            .await
            .unwrap();

        assert_eq!(created.roles, vec![Role::User]);
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let repository = MockTestUserRepository::new();

        let mut command = register_command(None);
        command.password = "short".to_string();

        let result = service(repository).register(command).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::PasswordTooShort { min: 8 }
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_blank_name() {
        let repository = MockTestUserRepository::new();

        let mut command = register_command(None);
        command.name = "  ".to_string();

        let result = service(repository).register(command).await;
        assert!(matches!(result.unwrap_err(), UserError::InvalidName));
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("pass_word!", vec![Role::User]);
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let username = Username::new("alice".to_string()).unwrap();
        let authenticated = service(repository)
            .authenticate(&username, "pass_word!")
            .await
            .unwrap();

        assert_eq!(authenticated.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("pass_word!", vec![Role::User]);
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let username = Username::new("alice".to_string()).unwrap();
        let result = service(repository).authenticate(&username, "nope").await;

        assert!(matches!(result.unwrap_err(), UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_username() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let username = Username::new("nobody".to_string()).unwrap();
        let result = service(repository).authenticate(&username, "pass_word!").await;

        assert!(matches!(result.unwrap_err(), UserError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_user_without_roles() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("pass_word!", vec![]);
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let username = Username::new("alice".to_string()).unwrap();
        let result = service(repository)
            .authenticate(&username, "pass_word!")
            .await;

        assert!(matches!(result.unwrap_err(), UserError::NoRolesAssigned));
    }

    #[tokio::test]
    async fn test_update_profile_never_touches_roles_or_password() {
        let mut repository = MockTestUserRepository::new();
        let existing = stored_user("pass_word!", vec![Role::User]);
        let original_hash = existing.password_hash.clone();

        repository
            .expect_find_by_id()
            .with(eq(UserId(7)))
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        let expected_hash = original_hash.clone();
        repository
            .expect_update()
            .withf(move |user| {
                user.name == "Alice Smith"
                    && user.phone == "555-0202"
                    && user.password_hash == expected_hash
                    && user.roles == vec![Role::User]
            })
            .times(1)
            .returning(|user| Ok(user));

        let command = UpdateUserCommand {
            name: "Alice Smith".to_string(),
            email: EmailAddress::new("alice.smith@example.com".to_string()).unwrap(),
            phone: "555-0202".to_string(),
        };

        let updated = service(repository)
            .update_profile(UserId(7), command)
            .await
            .unwrap();

        assert_eq!(updated.name, "Alice Smith");
    }

    #[tokio::test]
    async fn test_update_profile_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let command = UpdateUserCommand {
            name: "Alice".to_string(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            phone: "555-0101".to_string(),
        };

        let result = service(repository).update_profile(UserId(42), command).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(42)));
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_delete()
            .times(1)
            .returning(|id| Err(UserError::NotFound(id.0)));

        let result = service(repository).delete_user(UserId(42)).await;
        assert!(matches!(result.unwrap_err(), UserError::NotFound(42)));
    }
}
