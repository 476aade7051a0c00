pub mod adoption;
pub mod pet;
pub mod user;
