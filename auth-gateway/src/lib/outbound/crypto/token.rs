use auth::Claims;
use auth::JwtHandler;
use chrono::Duration;
use chrono::Utc;
use secrecy::ExposeSecret;
use secrecy::SecretString;

use crate::domain::user::errors::TokenError;
use crate::domain::user::models::AccessToken;
use crate::domain::user::models::TokenSubject;
use crate::domain::user::ports::TokenIssuer;

/// HS256 JWT issuer.
///
/// Claims: `sub` (national ID), `iat`, `exp`, plus `iss` and `role` when configured.
pub struct JwtTokenIssuer {
    handler: JwtHandler,
    issuer: Option<String>,
}

impl JwtTokenIssuer {
    pub fn new(secret: &SecretString, issuer: Option<String>) -> Self {
        Self {
            handler: JwtHandler::new(secret.expose_secret().as_bytes()),
            issuer,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, subject: &TokenSubject, ttl: Duration) -> Result<AccessToken, TokenError> {
        let mut claims = Claims::for_subject(subject.national_id.as_str(), Utc::now(), ttl)
            .ok_or_else(|| TokenError::IssuanceFailed("token expiry out of range".to_string()))?;

        if let Some(issuer) = &self.issuer {
            claims = claims.with_issuer(issuer.clone());
        }
        if let Some(role) = subject.role {
            claims = claims.with_extra("role", role);
        }

        self.handler
            .encode(&claims)
            .map(AccessToken::new)
            .map_err(|e| TokenError::IssuanceFailed(e.to_string()))
    }
}
