use thiserror::Error;

use crate::domain::user::models::ResponseStatus;

/// Error for NationalId validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NationalIdError {
    #[error("National ID is empty")]
    Empty,

    #[error("National ID must have {expected} digits, got {actual} characters")]
    InvalidLength { expected: usize, actual: usize },

    #[error("National ID must contain only digits")]
    NonDigit,
}

/// Error for plaintext password validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordInputError {
    #[error("Password is empty")]
    Empty,

    #[error("Password too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Caller input that cannot become a usable credential
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("{0}")]
    NationalId(#[from] NationalIdError),

    #[error("{0}")]
    Password(#[from] PasswordInputError),
}

/// Credential store could not serve the request
#[derive(Debug, Clone, Error)]
#[error("Credential store error: {0}")]
pub struct StoreError(pub String);

/// Error for inserting a new user
#[derive(Debug, Clone, Error)]
pub enum InsertError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error for password operations
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}

/// Error for token issuance
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Token issuance failed: {0}")]
    IssuanceFailed(String),
}

/// Failure of a subsystem the flows depend on
#[derive(Debug, Clone, Error)]
pub enum InfrastructureError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Top-level error for registration and authentication
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),

    // Shared by unknown users and wrong passwords
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Unsupported request type: {0}")]
    UnsupportedRequestType(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(#[from] InfrastructureError),
}

impl AuthError {
    /// Caller-facing status for this failure.
    pub fn status(&self) -> ResponseStatus {
        match self {
            AuthError::InvalidInput(_) | AuthError::UnsupportedRequestType(_) => {
                ResponseStatus::BadRequest
            }
            AuthError::InvalidCredentials => ResponseStatus::Unauthorized,
            AuthError::UserAlreadyExists => ResponseStatus::Conflict,
            AuthError::Infrastructure(_) => ResponseStatus::InternalError,
        }
    }

    pub fn is_infrastructure(&self) -> bool {
        matches!(self, AuthError::Infrastructure(_))
    }
}

impl From<NationalIdError> for AuthError {
    fn from(err: NationalIdError) -> Self {
        AuthError::InvalidInput(err.into())
    }
}

impl From<PasswordInputError> for AuthError {
    fn from(err: PasswordInputError) -> Self {
        AuthError::InvalidInput(err.into())
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Infrastructure(err.into())
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Infrastructure(err.into())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::Infrastructure(err.into())
    }
}
