use std::sync::Arc;

use auth::Authenticator;
use auth::HashingParams;
use identity_service::config::Config;
use identity_service::domain::identity::ports::IdentityServicePort;
use identity_service::domain::identity::service::IdentityService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryIdentityRepository;
use identity_service::outbound::repositories::PostgresIdentityRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database = config.database.is_some(),
        token_expiration_hours = ?config.jwt.expiration_hours,
        hashing_memory_kib = config.hashing.memory_kib,
        hashing_iterations = config.hashing.iterations,
        "Configuration loaded"
    );

    // Missing signing secret or bad work factor aborts startup here
    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        HashingParams::from(config.hashing),
    )?);

    if config.jwt.expiration_hours.is_none() {
        tracing::warn!("jwt.expiration_hours is unset; issued tokens never expire");
    }

    let identity_service: Arc<dyn IdentityServicePort> = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(IdentityService::new(
                Arc::new(PostgresIdentityRepository::new(pg_pool)),
                Arc::clone(&authenticator),
                config.jwt.expiration_hours,
            ))
        }
        None => {
            tracing::warn!("No database configured; identities are kept in memory only");
            Arc::new(IdentityService::new(
                Arc::new(InMemoryIdentityRepository::new()),
                Arc::clone(&authenticator),
                config.jwt.expiration_hours,
            ))
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(identity_service)).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
