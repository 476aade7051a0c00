use std::sync::Arc;

use adoption_service::config::Config;
use adoption_service::domain::adoption::access::AdoptionAccessPolicy;
use adoption_service::domain::adoption::service::AdoptionService;
use adoption_service::domain::pet::service::PetService;
use adoption_service::domain::user::service::UserService;
use adoption_service::inbound::http::router::create_router;
use adoption_service::inbound::http::router::AppState;
use adoption_service::outbound::repositories::adoption::PostgresAdoptionRepository;
use adoption_service::outbound::repositories::pet::PostgresPetRepository;
use adoption_service::outbound::repositories::user::PostgresUserRepository;
use auth::TokenService;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adoption_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "adoption-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let private_key = std::fs::read(&config.jwt.private_key_path)?;
    let public_key = std::fs::read(&config.jwt.public_key_path)?;
    let token_service = Arc::new(TokenService::from_rsa_pem(&private_key, &public_key)?);

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let pet_repository = Arc::new(PostgresPetRepository::new(pg_pool.clone()));
    let adoption_repository = Arc::new(PostgresAdoptionRepository::new(pg_pool));

    let state = AppState {
        user_service: Arc::new(UserService::new(
            Arc::clone(&user_repository),
            config.app.admin_key.clone(),
        )),
        pet_service: Arc::new(PetService::new(Arc::clone(&pet_repository))),
        adoption_service: Arc::new(AdoptionService::new(
            Arc::clone(&adoption_repository),
            user_repository,
            pet_repository,
        )),
        adoption_access: Arc::new(AdoptionAccessPolicy::new(adoption_repository)),
        token_service,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;

    Ok(())
}
