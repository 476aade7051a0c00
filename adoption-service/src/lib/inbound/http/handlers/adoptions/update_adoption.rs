use auth::Principal;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::super::ApiError;
use super::super::ApiSuccess;
use super::AdoptionData;
use super::AdoptionRequestBody;
use crate::adoption::models::AdoptionId;
use crate::domain::adoption::ports::AdoptionServicePort;
use crate::inbound::http::router::AppState;

pub async fn update_adoption(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(adoption_id): Path<i64>,
    Json(body): Json<AdoptionRequestBody>,
) -> Result<ApiSuccess<AdoptionData>, ApiError> {
    let id = AdoptionId(adoption_id);

    let allowed = state.adoption_access.permits_access(&principal, id).await?;
    if !allowed {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    state
        .adoption_service
        .update(id, body.into_command())
        .await
        .map_err(ApiError::from)
        .map(|ref adoption| ApiSuccess::new(StatusCode::OK, adoption.into()))
}
