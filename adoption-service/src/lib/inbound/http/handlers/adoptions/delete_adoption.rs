use auth::Principal;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::super::require_admin;
use super::super::ApiError;
use crate::adoption::models::AdoptionId;
use crate::domain::adoption::ports::AdoptionServicePort;
use crate::inbound::http::router::AppState;

pub async fn delete_adoption(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(adoption_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_admin(&principal)?;

    state
        .adoption_service
        .delete(AdoptionId(adoption_id))
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
