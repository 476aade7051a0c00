use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::super::ApiError;
use super::super::ApiSuccess;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::UserError;
use crate::user::errors::UsernameError;
use crate::user::models::EmailAddress;
use crate::user::models::Username;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let user = state
        .user_service
        .register(body.try_into_command()?)
        .await
        .map_err(|e| match e {
            // The registration contract reports every rejected field,
            // duplicates included, as a plain validation failure.
            UserError::UsernameAlreadyExists(_) | UserError::EmailAlreadyExists(_) => {
                ApiError::BadRequest(e.to_string())
            }
            _ => ApiError::from(e),
        })?;

    Ok(ApiSuccess::new(StatusCode::CREATED, (&user).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestBody {
    username: String,
    password: String,
    name: String,
    email: String,
    phone: String,
    admin_key: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterUserCommand, ParseRegisterRequestError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        Ok(RegisterUserCommand {
            username,
            password: self.password,
            name: self.name,
            email,
            phone: self.phone,
            admin_key: self.admin_key,
        })
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponseData {
    pub id: i64,
    pub username: String,
    pub roles: Vec<String>,
}

impl From<&User> for RegisterResponseData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.as_str().to_string(),
            roles: user.roles.iter().map(|r| r.granted_name().to_string()).collect(),
        }
    }
}
