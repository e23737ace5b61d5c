use axum::extract::State;
use axum::Json;
use secrecy::SecretString;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenData;
use crate::domain::user::models::AuthRequest;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Tagged entry point: `request_type` selects creation or authentication.
///
/// Responds `201` with `data: null` after creation and `200` with a token after
/// authentication.
pub async fn dispatch<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<DispatchRequestBody>,
) -> Result<ApiSuccess<Option<TokenData>>, ApiError> {
    let response = state.auth_service.handle(body.into_request()).await?;

    Ok(ApiSuccess::new(
        response.status.into(),
        response.token.map(|token| TokenData {
            token: token.into_string(),
        }),
    ))
}

/// HTTP request body for the tagged endpoint (raw JSON)
#[derive(Debug, Deserialize)]
pub struct DispatchRequestBody {
    cpf: String,
    password: SecretString,
    request_type: String,
}

impl DispatchRequestBody {
    fn into_request(self) -> AuthRequest {
        AuthRequest {
            national_id: self.cpf,
            password: self.password,
            request_type: self.request_type,
        }
    }
}
