use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::pet::errors::PetStatusError;

/// Pet available for adoption.
#[derive(Debug, Clone)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub kind: PetKind,
    pub breed: String,
    pub age: i32,
    pub location: String,
    pub status: PetStatus,
    pub created_at: DateTime<Utc>,
}

/// Pet unique identifier, assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PetId(pub i64);

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of animal (dog, cat, ...), maintained as a lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetKind {
    pub id: i64,
    pub name: String,
}

/// Lifecycle status of a pet.
///
/// AVAILABLE pets can be requested for adoption; an approved adoption moves
/// the pet to ADOPTED, a rejected one returns it to AVAILABLE. DISABLED pets
/// are hidden from the adoption flow entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetStatus {
    Available,
    Adopted,
    Disabled,
}

impl PetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetStatus::Available => "AVAILABLE",
            PetStatus::Adopted => "ADOPTED",
            PetStatus::Disabled => "DISABLED",
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetStatus {
    type Err = PetStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(PetStatus::Available),
            "ADOPTED" => Ok(PetStatus::Adopted),
            "DISABLED" => Ok(PetStatus::Disabled),
            other => Err(PetStatusError::Unknown(other.to_string())),
        }
    }
}

/// Command to add a new pet.
///
/// `status` is optional; omitted or AVAILABLE is accepted, anything else is
/// rejected so pets always enter the system adoptable.
#[derive(Debug)]
pub struct CreatePetCommand {
    pub name: String,
    pub kind: String,
    pub breed: String,
    pub age: i32,
    pub location: String,
    pub status: Option<String>,
}

/// Command to update an existing pet's details.
#[derive(Debug)]
pub struct UpdatePetCommand {
    pub name: String,
    pub kind: String,
    pub breed: String,
    pub age: i32,
    pub location: String,
    pub status: String,
}
