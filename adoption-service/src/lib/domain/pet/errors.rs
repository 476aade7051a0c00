use thiserror::Error;

/// Error for PetStatus parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PetStatusError {
    #[error("Unknown pet status: {0}")]
    Unknown(String),
}

/// Top-level error for all pet-related operations
#[derive(Debug, Clone, Error)]
pub enum PetError {
    #[error("Pet name must not be empty")]
    InvalidName,

    #[error("Pet kind must not be empty")]
    InvalidKind,

    #[error("Pet location must not be empty")]
    InvalidLocation,

    #[error("Pet age must not be negative")]
    InvalidAge,

    #[error("New pets must be AVAILABLE, got: {0}")]
    InvalidInitialStatus(String),

    #[error(transparent)]
    InvalidStatus(#[from] PetStatusError),

    #[error("Pet not found with ID {0}")]
    NotFound(i64),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
