mod common;

use std::sync::Arc;

use auth::JwtError;
use auth::JwtHandler;
use auth_gateway::domain::user::errors::AuthError;
use auth_gateway::domain::user::models::AuthRequest;
use auth_gateway::domain::user::models::AuthSettings;
use auth_gateway::domain::user::models::ResponseStatus;
use auth_gateway::domain::user::ports::AuthServicePort;
use auth_gateway::outbound::repositories::InMemoryCredentialStore;
use chrono::Duration;
use common::build_service;
use common::test_settings;
use common::JWT_SECRET;
use secrecy::SecretString;

const CPF: &str = "12345678900";

fn secret(value: &str) -> SecretString {
    SecretString::new(value.to_string())
}

#[tokio::test]
async fn test_register_then_login() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let service = build_service(Arc::clone(&store), test_settings());

    service.register(CPF, secret("secret123")).await.unwrap();
    let token = service.login(CPF, secret("secret123")).await.unwrap();

    let claims = JwtHandler::new(JWT_SECRET.as_bytes())
        .decode_at(token.as_str(), chrono::Utc::now().timestamp())
        .unwrap();
    assert_eq!(claims.sub.as_deref(), Some(CPF));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_fail_identically() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let service = build_service(store, test_settings());
    service.register(CPF, secret("secret123")).await.unwrap();

    let wrong_password = service.login(CPF, secret("wrong")).await.unwrap_err();
    let unknown_user = service
        .login("00000000000", secret("secret123"))
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert_eq!(wrong_password.status(), ResponseStatus::Unauthorized);
}

#[tokio::test]
async fn test_concurrent_duplicate_registration() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let service = Arc::new(build_service(Arc::clone(&store), test_settings()));

    let first = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.register(CPF, secret("first-password")).await }
    });
    let second = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.register(CPF, secret("second-password")).await }
    });

    let results = [first.await.unwrap(), second.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(AuthError::UserAlreadyExists)))
            .count(),
        1
    );
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_token_expires_after_ttl() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let service = build_service(store, test_settings());
    service.register(CPF, secret("secret123")).await.unwrap();

    let token = service.login(CPF, secret("secret123")).await.unwrap();

    let handler = JwtHandler::new(JWT_SECRET.as_bytes());
    let iat = handler.decode_at(token.as_str(), 0).unwrap().iat.unwrap();

    assert!(handler.decode_at(token.as_str(), iat + 5 * 60).is_ok());
    assert!(matches!(
        handler.decode_at(token.as_str(), iat + 5 * 60 + 1),
        Err(JwtError::TokenExpired)
    ));
}

#[tokio::test]
async fn test_role_claim_when_enabled() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let settings = AuthSettings {
        token_ttl: Duration::minutes(5),
        include_role_claim: true,
    };
    let service = build_service(store, settings);
    service.register(CPF, secret("secret123")).await.unwrap();

    let token = service.login(CPF, secret("secret123")).await.unwrap();

    let claims = JwtHandler::new(JWT_SECRET.as_bytes())
        .decode_at(token.as_str(), 0)
        .unwrap();
    assert_eq!(claims.role().as_deref(), Some("USER"));
}

#[tokio::test]
async fn test_handle_dispatches_on_request_type() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let service = build_service(Arc::clone(&store), test_settings());

    let created = service
        .handle(AuthRequest::new(CPF, "secret123", "USER_CREATION"))
        .await
        .unwrap();
    assert_eq!(created.status, ResponseStatus::Created);
    assert!(created.token.is_none());

    let authenticated = service
        .handle(AuthRequest::new(CPF, "secret123", "USER_AUTHENTICATION"))
        .await
        .unwrap();
    assert_eq!(authenticated.status, ResponseStatus::Ok);
    assert!(authenticated.token.is_some());

    let unsupported = service
        .handle(AuthRequest::new(CPF, "secret123", "user_creation"))
        .await
        .unwrap_err();
    assert!(matches!(unsupported, AuthError::UnsupportedRequestType(_)));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_registration_and_login_scenario() {
    let store = Arc::new(InMemoryCredentialStore::new());
    let service = build_service(Arc::clone(&store), test_settings());

    assert!(service.register(CPF, secret("secret123")).await.is_ok());

    let token = service.login(CPF, secret("secret123")).await.unwrap();
    let claims = JwtHandler::new(JWT_SECRET.as_bytes())
        .decode_at(token.as_str(), 0)
        .unwrap();
    assert_eq!(claims.sub.as_deref(), Some(CPF));

    assert!(matches!(
        service.login(CPF, secret("wrong")).await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        service.login("00000000000", secret("anything")).await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        service.register(CPF, secret("secret123")).await,
        Err(AuthError::UserAlreadyExists)
    ));
    assert_eq!(store.len().await, 1);
}
