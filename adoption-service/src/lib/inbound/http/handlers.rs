use ::auth::Principal;
use ::auth::TokenError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::adoption::errors::AdoptionError;
use crate::pet::errors::PetError;
use crate::user::errors::UserError;

pub mod adoptions;
pub mod auth;
pub mod pets;
pub mod users;

/// Successful response: a status code and a flat JSON body.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    InternalServerError(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

/// Flat error body; every failure serializes as `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                ApiError::Conflict(err.to_string())
            }
            UserError::InvalidCredentials | UserError::NoRolesAssigned => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidName
            | UserError::InvalidPhone
            | UserError::PasswordTooShort { .. } => ApiError::BadRequest(err.to_string()),
            UserError::Password(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<PetError> for ApiError {
    fn from(err: PetError) -> Self {
        match err {
            PetError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PetError::InvalidName
            | PetError::InvalidKind
            | PetError::InvalidLocation
            | PetError::InvalidAge
            | PetError::InvalidInitialStatus(_)
            | PetError::InvalidStatus(_) => ApiError::BadRequest(err.to_string()),
            PetError::DatabaseError(_) | PetError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<AdoptionError> for ApiError {
    fn from(err: AdoptionError) -> Self {
        match err {
            AdoptionError::NotFound(_)
            | AdoptionError::UserNotFound(_)
            | AdoptionError::PetNotFound(_) => ApiError::NotFound(err.to_string()),
            AdoptionError::AccessDenied => ApiError::Forbidden(err.to_string()),
            AdoptionError::AlreadyDecided { .. } | AdoptionError::PetUnavailable(_) => {
                ApiError::Conflict(err.to_string())
            }
            AdoptionError::InvalidUserId(_)
            | AdoptionError::InvalidPetId(_)
            | AdoptionError::InvalidStatus(_) => ApiError::BadRequest(err.to_string()),
            AdoptionError::DatabaseError(_) | AdoptionError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::TokenExpired | TokenError::InvalidToken(_) => {
                ApiError::Unauthorized(err.to_string())
            }
            TokenError::MissingClaim(_) => ApiError::Unauthorized(err.to_string()),
            TokenError::SigningFailed(_) | TokenError::InvalidKey(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

/// Gate for administrator-only handlers.
pub fn require_admin(principal: &Principal) -> Result<(), ApiError> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Access denied".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use ::auth::Role;

    use super::*;

    #[test]
    fn test_duplicate_username_maps_to_conflict() {
        let err = ApiError::from(UserError::UsernameAlreadyExists("alice".to_string()));
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_access_denied_maps_to_forbidden() {
        let err = ApiError::from(AdoptionError::AccessDenied);
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_pet_contention_maps_to_conflict() {
        let err = ApiError::from(AdoptionError::PetUnavailable(1));
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_require_admin_rejects_plain_user() {
        let principal = Principal::new("alice".to_string(), vec![Role::User]);
        assert!(require_admin(&principal).is_err());
    }

    #[test]
    fn test_require_admin_accepts_admin() {
        let principal = Principal::new("boss".to_string(), vec![Role::Admin]);
        assert!(require_admin(&principal).is_ok());
    }
}
