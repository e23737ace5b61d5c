use std::sync::Arc;
use std::time::Duration;

use auth_gateway::config::Config;
use auth_gateway::domain::user::service::AuthService;
use auth_gateway::inbound::http::router::create_router;
use auth_gateway::outbound::crypto::Argon2PasswordHasher;
use auth_gateway::outbound::crypto::JwtTokenIssuer;
use auth_gateway::outbound::repositories::PostgresCredentialStore;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-gateway",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        token_ttl_minutes = config.jwt.expiration_minutes,
        include_role_claim = config.jwt.include_role_claim,
        argon2_memory_kib = config.password.memory_kib,
        argon2_iterations = config.password.iterations,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(config.database.url.expose_secret())
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    let credential_store = Arc::new(PostgresCredentialStore::new(pg_pool));
    let password_hasher = Arc::new(Argon2PasswordHasher::new(config.password.into())?);
    let token_issuer = Arc::new(JwtTokenIssuer::new(
        &config.jwt.secret,
        config.jwt.issuer.clone(),
    ));

    let auth_service = Arc::new(AuthService::new(
        credential_store,
        password_hasher,
        token_issuer,
        config.auth_settings(),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
