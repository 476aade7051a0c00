use std::fmt;
use std::str::FromStr;

use auth::Role;

use crate::user::errors::EmailError;
use crate::user::errors::UsernameError;

/// Registered user aggregate.
///
/// The password hash never leaves the domain layer; outbound DTOs are built
/// from the remaining fields.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

/// User unique identifier, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type, unique across the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(username: String) -> Result<Self, UsernameError> {
        if username.trim().is_empty() {
            return Err(UsernameError::Blank);
        }
        Ok(Self(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type, validated with an RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to register a new user.
///
/// `admin_key` is the optional administrative secret; when it matches the
/// configured value the user is registered with the administrator role.
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub username: Username,
    pub password: String,
    pub name: String,
    pub email: EmailAddress,
    pub phone: String,
    pub admin_key: Option<String>,
}

/// Command to update a user's profile.
///
/// Only name, email, and phone are mutable after registration; roles and
/// password are not touched here.
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub name: String,
    pub email: EmailAddress,
    pub phone: String,
}
