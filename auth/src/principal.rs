use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Access-control roles recognized by the service.
///
/// Roles travel in two spellings: the bare claim form (`ADMIN`) written into
/// token `roles`, and the prefixed granted-authority form (`ROLE_ADMIN`)
/// persisted with the user record. Parsing accepts both so a role string can
/// be mapped back to the same variant regardless of where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Claim-form name, as carried in token `roles`.
    pub fn claim_name(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    /// Prefixed granted-authority form, as stored with the user record.
    pub fn granted_name(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::User => "ROLE_USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.claim_name())
    }
}

/// Error for role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unrecognized role: {0}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("ROLE_").unwrap_or(s) {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(RoleParseError(other.to_string())),
        }
    }
}

/// Authenticated identity reconstructed from a verified token.
///
/// Never persisted; rebuilt per request from token claims. The role set is
/// non-empty by construction: verification rejects tokens that carry no
/// recognizable role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn new(username: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            username: username.into(),
            roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
