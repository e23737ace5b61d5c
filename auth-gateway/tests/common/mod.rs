#![allow(dead_code)]

use std::sync::Arc;

use auth::HashingParams;
use auth::JwtHandler;
use auth_gateway::domain::user::models::AuthSettings;
use auth_gateway::domain::user::service::AuthService;
use auth_gateway::inbound::http::router::create_router;
use auth_gateway::outbound::crypto::Argon2PasswordHasher;
use auth_gateway::outbound::crypto::JwtTokenIssuer;
use auth_gateway::outbound::repositories::InMemoryCredentialStore;
use chrono::Duration;
use secrecy::SecretString;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

pub type TestAuthService = AuthService<InMemoryCredentialStore, Argon2PasswordHasher, JwtTokenIssuer>;

/// Minimal Argon2 work factor so tests stay fast
pub fn fast_hashing_params() -> HashingParams {
    HashingParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

pub fn test_settings() -> AuthSettings {
    AuthSettings {
        token_ttl: Duration::minutes(5),
        include_role_claim: false,
    }
}

/// Service wired to in-memory and real crypto adapters
pub fn build_service(
    store: Arc<InMemoryCredentialStore>,
    settings: AuthSettings,
) -> TestAuthService {
    let hasher = Argon2PasswordHasher::new(fast_hashing_params())
        .expect("Failed to build password hasher");
    let issuer = JwtTokenIssuer::new(&SecretString::new(JWT_SECRET.to_string()), None);

    AuthService::new(store, Arc::new(hasher), Arc::new(issuer), settings)
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryCredentialStore>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(InMemoryCredentialStore::new());
        let auth_service = Arc::new(build_service(Arc::clone(&store), test_settings()));

        let router = create_router(auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            store,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET.as_bytes()),
        }
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }
}
