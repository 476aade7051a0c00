//! Authentication library for the pet adoption service.
//!
//! Provides the credential primitives the HTTP service builds on:
//! - RSA-signed JWT issuance and verification (access + refresh token pair)
//! - Typed principal and role model reconstructed from verified tokens
//! - Password hashing (Argon2id)
//!
//! Tokens are signed with the private half of an RSA key pair and verified
//! with the public half, so a verifier can be deployed without any signing
//! material ([`TokenVerifier`] is constructible from the public key alone).

pub mod jwt;
pub mod password;
pub mod principal;

// Re-export commonly used items
pub use jwt::AccessClaims;
pub use jwt::TokenError;
pub use jwt::TokenService;
pub use jwt::TokenVerifier;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use principal::Principal;
pub use principal::Role;
