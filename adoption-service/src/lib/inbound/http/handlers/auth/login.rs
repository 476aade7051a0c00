use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::super::ApiError;
use super::super::ApiSuccess;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::models::Username;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    // A malformed username is indistinguishable from a wrong one.
    let username = Username::new(body.username)
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let user = state
        .user_service
        .authenticate(&username, &body.password)
        .await?;

    let roles: Vec<String> = user
        .roles
        .iter()
        .map(|r| r.granted_name().to_string())
        .collect();

    let access_token = state
        .token_service
        .issue_access_token(user.username.as_str(), &roles)?;
    let refresh_token = state
        .token_service
        .issue_refresh_token(user.username.as_str(), &roles)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            access_token,
            refresh_token,
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseData {
    pub access_token: String,
    pub refresh_token: String,
}
