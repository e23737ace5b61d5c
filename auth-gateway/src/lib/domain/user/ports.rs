use async_trait::async_trait;
use chrono::Duration;
use secrecy::SecretString;

use crate::domain::user::errors::AuthError;
use crate::domain::user::errors::InsertError;
use crate::domain::user::errors::PasswordError;
use crate::domain::user::errors::StoreError;
use crate::domain::user::errors::TokenError;
use crate::domain::user::models::AccessToken;
use crate::domain::user::models::AuthRequest;
use crate::domain::user::models::AuthResponse;
use crate::domain::user::models::NationalId;
use crate::domain::user::models::Password;
use crate::domain::user::models::PasswordHash;
use crate::domain::user::models::TokenSubject;
use crate::domain::user::models::User;
use crate::domain::user::models::UserLookup;

/// Port for the authentication domain service.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Dispatch a tagged request to registration or login.
    ///
    /// # Arguments
    /// * `request` - Raw request carrying national ID, password and request type
    ///
    /// # Returns
    /// `Created` with no token, or `Ok` with a token
    ///
    /// # Errors
    /// * `UnsupportedRequestType` - Request type is not recognised
    /// * any error from `register` or `login`
    async fn handle(&self, request: AuthRequest) -> Result<AuthResponse, AuthError>;

    /// Create a new user with role `USER`.
    ///
    /// # Errors
    /// * `InvalidInput` - National ID or password is malformed
    /// * `UserAlreadyExists` - National ID is already registered
    /// * `Infrastructure` - Store or hashing failed
    async fn register(&self, national_id: &str, password: SecretString) -> Result<(), AuthError>;

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown national ID or wrong password
    /// * `Infrastructure` - Store, hashing or signing failed
    async fn login(&self, national_id: &str, password: SecretString)
        -> Result<AccessToken, AuthError>;
}

/// Persistence operations for user credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve user by national ID.
    ///
    /// # Arguments
    /// * `national_id` - Business key to search for
    ///
    /// # Returns
    /// `Found` with the user, or `NotFound`
    ///
    /// # Errors
    /// * `StoreError` - Store could not be reached or returned garbage
    async fn find_by_national_id(&self, national_id: &NationalId)
        -> Result<UserLookup, StoreError>;

    /// Persist a new user atomically.
    ///
    /// # Errors
    /// * `UniqueViolation` - National ID is already taken
    /// * `Store` - Write failed; nothing was stored
    async fn insert(&self, user: User) -> Result<(), InsertError>;
}

/// One-way salted password hashing.
///
/// Implementations are CPU-bound; the service runs them on the blocking pool.
pub trait PasswordHasher: Send + Sync + 'static {
    /// Hash a plaintext password with a fresh salt.
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordError>;

    /// Check a plaintext password against a stored hash in constant time.
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is malformed
    fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, PasswordError>;
}

/// Signed, time-limited token creation.
pub trait TokenIssuer: Send + Sync + 'static {
    /// Issue a token for `subject` expiring `ttl` after now.
    fn issue(&self, subject: &TokenSubject, ttl: Duration) -> Result<AccessToken, TokenError>;
}
