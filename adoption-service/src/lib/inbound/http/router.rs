use std::sync::Arc;
use std::time::Duration;

use auth::TokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::adoptions::approve_adoption::approve_adoption;
use super::handlers::adoptions::create_adoption::create_adoption;
use super::handlers::adoptions::delete_adoption::delete_adoption;
use super::handlers::adoptions::get_adoption::get_adoption;
use super::handlers::adoptions::list_adoptions::list_adoptions;
use super::handlers::adoptions::reject_adoption::reject_adoption;
use super::handlers::adoptions::update_adoption::update_adoption;
use super::handlers::auth::login::login;
use super::handlers::auth::refresh_token::refresh_token;
use super::handlers::auth::register::register;
use super::handlers::pets::create_pet::create_pet;
use super::handlers::pets::delete_pet::delete_pet;
use super::handlers::pets::get_pet::get_pet;
use super::handlers::pets::list_pets::list_pets;
use super::handlers::pets::update_pet::update_pet;
use super::handlers::users::delete_user::delete_user;
use super::handlers::users::get_user::get_user;
use super::handlers::users::list_users::list_users;
use super::handlers::users::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use crate::domain::adoption::access::AdoptionAccessPolicy;
use crate::domain::adoption::service::AdoptionService;
use crate::domain::pet::service::PetService;
use crate::domain::user::service::UserService;
use crate::outbound::repositories::adoption::PostgresAdoptionRepository;
use crate::outbound::repositories::pet::PostgresPetRepository;
use crate::outbound::repositories::user::PostgresUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<PostgresUserRepository>>,
    pub pet_service: Arc<PetService<PostgresPetRepository>>,
    pub adoption_service: Arc<
        AdoptionService<PostgresAdoptionRepository, PostgresUserRepository, PostgresPetRepository>,
    >,
    pub adoption_access: Arc<AdoptionAccessPolicy<PostgresAdoptionRepository>>,
    pub token_service: Arc<TokenService>,
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/token/refresh", post(refresh_token));

    let protected_routes = Router::new()
        .route("/api/adoptions", post(create_adoption).get(list_adoptions))
        .route(
            "/api/adoptions/:adoption_id",
            get(get_adoption)
                .put(update_adoption)
                .delete(delete_adoption),
        )
        .route("/api/adoptions/:adoption_id/approve", post(approve_adoption))
        .route("/api/adoptions/:adoption_id/reject", post(reject_adoption))
        .route("/api/pets", post(create_pet).get(list_pets))
        .route(
            "/api/pets/:pet_id",
            get(get_pet).put(update_pet).delete(delete_pet),
        )
        .route("/api/users", get(list_users))
        .route(
            "/api/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
