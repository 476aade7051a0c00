use auth::Principal;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::super::ApiError;
use super::super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::models::EmailAddress;
use crate::user::models::UserId;

/// Users may edit their own profile; administrators may edit anyone's.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
    Json(body): Json<UpdateUserRequestBody>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let id = UserId(user_id);

    if !principal.is_admin() {
        let target = state.user_service.get_user(id).await?;
        if target.username.as_str() != principal.username {
            return Err(ApiError::Forbidden("Access denied".to_string()));
        }
    }

    state
        .user_service
        .update_profile(id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequestBody {
    name: String,
    email: String,
    phone: String,
}

#[derive(Debug, Clone, Error)]
enum ParseUpdateUserRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl UpdateUserRequestBody {
    fn try_into_command(self) -> Result<UpdateUserCommand, ParseUpdateUserRequestError> {
        let email = EmailAddress::new(self.email)?;
        Ok(UpdateUserCommand {
            name: self.name,
            email,
            phone: self.phone,
        })
    }
}

impl From<ParseUpdateUserRequestError> for ApiError {
    fn from(err: ParseUpdateUserRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
