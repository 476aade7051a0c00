use thiserror::Error;

/// Error for AdoptionStatus validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdoptionStatusError {
    #[error("Adoption status must not be empty")]
    Blank,
}

/// Top-level error for all adoption-related operations
#[derive(Debug, Clone, Error)]
pub enum AdoptionError {
    // Field-level validation on create/update
    #[error("User ID {0} must not be negative")]
    InvalidUserId(i64),

    #[error("Pet ID {0} must not be negative")]
    InvalidPetId(i64),

    #[error(transparent)]
    InvalidStatus(#[from] AdoptionStatusError),

    // Domain-level errors
    #[error("Adoption not found with ID {0}")]
    NotFound(i64),

    #[error("User not found with ID {0}")]
    UserNotFound(i64),

    #[error("Pet not found with ID {0}")]
    PetNotFound(i64),

    #[error("Access denied")]
    AccessDenied,

    #[error("Adoption {id} has already been decided: {status}")]
    AlreadyDecided { id: i64, status: String },

    #[error("Pet {0} is no longer available for adoption")]
    PetUnavailable(i64),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
