use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::adoption::errors::AdoptionStatusError;
use crate::pet::models::Pet;
use crate::user::models::User;

/// Adoption request aggregate, carrying its owner and pet eagerly loaded.
#[derive(Debug, Clone)]
pub struct Adoption {
    pub id: AdoptionId,
    pub user: User,
    pub pet: Pet,
    pub status: AdoptionStatus,
    pub adoption_date: DateTime<Utc>,
}

/// Adoption unique identifier, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdoptionId(pub i64);

impl fmt::Display for AdoptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Status of an adoption request.
///
/// The lifecycle is PENDING to APPROVED or REJECTED; both decisions are
/// terminal. The value is kept as validated text rather than a closed enum
/// because callers may create requests with their own workflow labels, and
/// only the two decision states carry special meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdoptionStatus(String);

impl AdoptionStatus {
    pub const PENDING: &'static str = "PENDING";
    pub const APPROVED: &'static str = "APPROVED";
    pub const REJECTED: &'static str = "REJECTED";

    pub fn new(status: String) -> Result<Self, AdoptionStatusError> {
        if status.trim().is_empty() {
            return Err(AdoptionStatusError::Blank);
        }
        Ok(Self(status))
    }

    pub fn pending() -> Self {
        Self(Self::PENDING.to_string())
    }

    pub fn approved() -> Self {
        Self(Self::APPROVED.to_string())
    }

    pub fn rejected() -> Self {
        Self(Self::REJECTED.to_string())
    }

    /// A decided adoption may not transition again.
    pub fn is_terminal(&self) -> bool {
        self.0 == Self::APPROVED || self.0 == Self::REJECTED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AdoptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Adoption ready to be persisted, with references already resolved.
#[derive(Debug, Clone)]
pub struct NewAdoption {
    pub user: User,
    pub pet: Pet,
    pub status: AdoptionStatus,
    pub adoption_date: DateTime<Utc>,
}

/// Command to create or update an adoption request.
///
/// References arrive as raw identifiers straight off the wire and are
/// validated and resolved by the service.
#[derive(Debug, Clone)]
pub struct AdoptionCommand {
    pub user_id: i64,
    pub pet_id: i64,
    pub status: String,
    pub adoption_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rejects_blank() {
        assert_eq!(
            AdoptionStatus::new("   ".to_string()).unwrap_err(),
            AdoptionStatusError::Blank
        );
    }

    #[test]
    fn test_only_decisions_are_terminal() {
        assert!(AdoptionStatus::approved().is_terminal());
        assert!(AdoptionStatus::rejected().is_terminal());
        assert!(!AdoptionStatus::pending().is_terminal());
        assert!(!AdoptionStatus::new("WAITLISTED".to_string()).unwrap().is_terminal());
    }
}
