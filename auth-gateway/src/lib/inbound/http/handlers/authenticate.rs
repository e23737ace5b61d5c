use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use secrecy::SecretString;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenData;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn authenticate<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<AuthenticateRequestBody>,
) -> Result<ApiSuccess<TokenData>, ApiError> {
    let token = state
        .auth_service
        .login(&body.cpf, body.password)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenData {
            token: token.into_string(),
        },
    ))
}

#[derive(Debug, Deserialize)]
pub struct AuthenticateRequestBody {
    cpf: String,
    password: SecretString,
}
