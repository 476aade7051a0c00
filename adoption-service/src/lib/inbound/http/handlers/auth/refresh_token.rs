use auth::TokenError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::super::ApiError;
use super::super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequestBody>,
) -> Result<ApiSuccess<RefreshTokenResponseData>, ApiError> {
    if body.refresh_token.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Refresh token must not be empty".to_string(),
        ));
    }

    let access_token = state
        .token_service
        .refresh_access_token(&body.refresh_token)
        .map_err(|e| match e {
            // A refresh token that fails verification is a forbidden
            // request, not merely unauthenticated.
            TokenError::TokenExpired | TokenError::InvalidToken(_) | TokenError::MissingClaim(_) => {
                ApiError::Forbidden(e.to_string())
            }
            TokenError::SigningFailed(_) | TokenError::InvalidKey(_) => {
                ApiError::InternalServerError(e.to_string())
            }
        })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RefreshTokenResponseData { access_token },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequestBody {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponseData {
    pub access_token: String,
}
