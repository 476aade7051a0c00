use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::inbound::http::router::AppState;

/// Middleware that verifies the bearer token and stores the resulting
/// Principal in the request extensions for handlers to consume.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let principal = state.token_service.verify(token).map_err(|e| {
        tracing::warn!("Token verification failed: {}", e);
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid or expired token"
            })),
        )
            .into_response()
    })?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Missing Authorization header"
                })),
            )
                .into_response()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header"
            })),
        )
            .into_response()
    })?;

    // Strip the scheme exactly once; the rest is the token verbatim.
    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid Authorization header format. Expected: Bearer <token>"
            })),
        )
            .into_response()
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request_with_authorization(value: &str) -> Request {
        axum::http::Request::builder()
            .uri("/api/adoptions")
            .header(http::header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extracts_token_after_bearer_scheme() {
        let req = request_with_authorization("Bearer abc.def.ghi");
        assert_eq!(extract_token_from_header(&req).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_strips_scheme_exactly_once() {
        let req = request_with_authorization("Bearer Bearer abc");
        assert_eq!(extract_token_from_header(&req).unwrap(), "Bearer abc");
    }

    #[test]
    fn test_rejects_missing_scheme() {
        let req = request_with_authorization("Basic abc");
        assert!(extract_token_from_header(&req).is_err());
    }

    #[test]
    fn test_rejects_missing_header() {
        let req = axum::http::Request::builder()
            .uri("/api/adoptions")
            .body(Body::empty())
            .unwrap();
        assert!(extract_token_from_header(&req).is_err());
    }
}
