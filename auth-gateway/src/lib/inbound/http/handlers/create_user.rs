use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use secrecy::SecretString;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn create_user<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .auth_service
        .register(&body.cpf, body.password)
        .await
        .map_err(ApiError::from)
        .map(|()| ApiSuccess::new(StatusCode::CREATED, ()))
}

/// HTTP request body for creating a user (raw JSON)
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    cpf: String,
    password: SecretString,
}
