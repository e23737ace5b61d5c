use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use secrecy::ExposeSecret;
use secrecy::SecretString;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::user::errors::AuthError;
use crate::domain::user::errors::NationalIdError;
use crate::domain::user::errors::PasswordInputError;
use crate::domain::user::errors::RoleError;

/// User aggregate entity.
///
/// Represents a registered credential holder. Records are created once and never
/// updated by this service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub national_id: NationalId,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Brazilian individual taxpayer number (CPF), the business key of a user.
///
/// Only the shape is enforced: exactly 11 ASCII digits once surrounding
/// whitespace is trimmed. Check digits are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NationalId(String);

impl NationalId {
    const LENGTH: usize = 11;

    /// Create a new valid national ID.
    ///
    /// # Arguments
    /// * `national_id` - Raw CPF string
    ///
    /// # Errors
    /// * `Empty` - Input is empty or whitespace
    /// * `InvalidLength` - Input is not 11 characters long
    /// * `NonDigit` - Input contains something other than ASCII digits
    pub fn new(national_id: impl AsRef<str>) -> Result<Self, NationalIdError> {
        let trimmed = national_id.as_ref().trim();

        if trimmed.is_empty() {
            return Err(NationalIdError::Empty);
        }
        if trimmed.len() != Self::LENGTH {
            return Err(NationalIdError::InvalidLength {
                expected: Self::LENGTH,
                actual: trimmed.chars().count(),
            });
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NationalIdError::NonDigit);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Get national ID as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe rendering that keeps only the last four digits.
    pub fn masked(&self) -> String {
        let visible = &self.0[Self::LENGTH - 4..];
        format!("*******{}", visible)
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plaintext password held only for the duration of a request.
///
/// Backed by `SecretString`: redacted in `Debug` output and zeroized on drop.
#[derive(Debug)]
pub struct Password(SecretString);

impl Password {
    const MAX_LENGTH: usize = 128;

    /// Validate a plaintext password.
    ///
    /// # Errors
    /// * `Empty` - Password is empty or whitespace only
    /// * `TooLong` - Password exceeds 128 characters
    pub fn new(password: SecretString) -> Result<Self, PasswordInputError> {
        let exposed = password.expose_secret();

        if exposed.trim().is_empty() {
            return Err(PasswordInputError::Empty);
        }
        let length = exposed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(PasswordInputError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(password))
    }

    /// Borrow the plaintext. Callers must not log or persist it.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Opaque one-way password hash (PHC string).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash([REDACTED])")
    }
}

/// Role recorded on a user. Self-registration always yields `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

/// Tag selecting which flow an `AuthRequest` is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    UserCreation,
    UserAuthentication,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::UserCreation => "USER_CREATION",
            RequestType::UserAuthentication => "USER_AUTHENTICATION",
        }
    }
}

impl FromStr for RequestType {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER_CREATION" => Ok(RequestType::UserCreation),
            "USER_AUTHENTICATION" => Ok(RequestType::UserAuthentication),
            other => Err(AuthError::UnsupportedRequestType(other.to_string())),
        }
    }
}

/// Raw tagged request as received from a transport adapter.
///
/// Fields are validated by the service, not here.
#[derive(Debug)]
pub struct AuthRequest {
    pub national_id: String,
    pub password: SecretString,
    pub request_type: String,
}

impl AuthRequest {
    pub fn new(
        national_id: impl Into<String>,
        password: impl Into<String>,
        request_type: impl Into<String>,
    ) -> Self {
        Self {
            national_id: national_id.into(),
            password: SecretString::new(password.into()),
            request_type: request_type.into(),
        }
    }
}

/// Outcome status of a handled request, independent of any transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    Created,
    BadRequest,
    Unauthorized,
    Conflict,
    InternalError,
}

impl ResponseStatus {
    /// HTTP-equivalent status code.
    pub fn code(&self) -> u16 {
        match self {
            ResponseStatus::Ok => 200,
            ResponseStatus::Created => 201,
            ResponseStatus::BadRequest => 400,
            ResponseStatus::Unauthorized => 401,
            ResponseStatus::Conflict => 409,
            ResponseStatus::InternalError => 500,
        }
    }
}

/// Successful response envelope produced by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub status: ResponseStatus,
    pub token: Option<AccessToken>,
}

impl AuthResponse {
    pub fn created() -> Self {
        Self {
            status: ResponseStatus::Created,
            token: None,
        }
    }

    pub fn authenticated(token: AccessToken) -> Self {
        Self {
            status: ResponseStatus::Ok,
            token: Some(token),
        }
    }
}

/// Signed, time-limited token handed back on successful authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// What a token is bound to.
///
/// `role` is only set when the role claim is explicitly enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub national_id: NationalId,
    pub role: Option<Role>,
}

/// Immutable settings the service receives at construction.
#[derive(Debug, Clone, Copy)]
pub struct AuthSettings {
    pub token_ttl: Duration,
    pub include_role_claim: bool,
}

/// Result of looking a user up by national ID.
///
/// Store failures travel separately as `StoreError`, so "no rows" can never be
/// mistaken for an outage.
#[derive(Debug, Clone)]
pub enum UserLookup {
    Found(User),
    NotFound,
}
