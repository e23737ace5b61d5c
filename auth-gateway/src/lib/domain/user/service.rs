use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use secrecy::SecretString;

use crate::domain::user::errors::AuthError;
use crate::domain::user::errors::InfrastructureError;
use crate::domain::user::errors::InsertError;
use crate::domain::user::models::AccessToken;
use crate::domain::user::models::AuthRequest;
use crate::domain::user::models::AuthResponse;
use crate::domain::user::models::AuthSettings;
use crate::domain::user::models::NationalId;
use crate::domain::user::models::Password;
use crate::domain::user::models::PasswordHash;
use crate::domain::user::models::RequestType;
use crate::domain::user::models::Role;
use crate::domain::user::models::TokenSubject;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserLookup;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::CredentialStore;
use crate::domain::user::ports::PasswordHasher;
use crate::domain::user::ports::TokenIssuer;

/// Domain service implementation for registration and authentication.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<CS, PH, TI>
where
    CS: CredentialStore,
    PH: PasswordHasher,
    TI: TokenIssuer,
{
    store: Arc<CS>,
    hasher: Arc<PH>,
    issuer: Arc<TI>,
    settings: AuthSettings,
}

impl<CS, PH, TI> AuthService<CS, PH, TI>
where
    CS: CredentialStore,
    PH: PasswordHasher,
    TI: TokenIssuer,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `hasher` - Password hashing implementation
    /// * `issuer` - Token signing implementation
    /// * `settings` - Token TTL and claim options, fixed for the service lifetime
    pub fn new(store: Arc<CS>, hasher: Arc<PH>, issuer: Arc<TI>, settings: AuthSettings) -> Self {
        Self {
            store,
            hasher,
            issuer,
            settings,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<PasswordHash, AuthError> {
        let hasher = Arc::clone(&self.hasher);

        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| InfrastructureError::Task(e.to_string()))??;

        Ok(hash)
    }

    async fn verify_password(
        &self,
        password: Password,
        hash: PasswordHash,
    ) -> Result<bool, AuthError> {
        let hasher = Arc::clone(&self.hasher);

        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| InfrastructureError::Task(e.to_string()))??;

        Ok(matches)
    }
}

#[async_trait]
impl<CS, PH, TI> AuthServicePort for AuthService<CS, PH, TI>
where
    CS: CredentialStore,
    PH: PasswordHasher,
    TI: TokenIssuer,
{
    async fn handle(&self, request: AuthRequest) -> Result<AuthResponse, AuthError> {
        let request_type = request
            .request_type
            .parse::<RequestType>()
            .inspect_err(|e| {
                log_failure(&request.request_type, &request.national_id, e);
            })?;

        match request_type {
            RequestType::UserCreation => self
                .register(&request.national_id, request.password)
                .await
                .map(|()| AuthResponse::created()),
            RequestType::UserAuthentication => self
                .login(&request.national_id, request.password)
                .await
                .map(AuthResponse::authenticated),
        }
    }

    async fn register(&self, national_id: &str, password: SecretString) -> Result<(), AuthError> {
        self.create_user(national_id, password)
            .await
            .inspect_err(|e| {
                log_failure(RequestType::UserCreation.as_str(), national_id, e);
            })
    }

    async fn login(
        &self,
        national_id: &str,
        password: SecretString,
    ) -> Result<AccessToken, AuthError> {
        self.authenticate_user(national_id, password)
            .await
            .inspect_err(|e| {
                log_failure(RequestType::UserAuthentication.as_str(), national_id, e);
            })
    }
}

impl<CS, PH, TI> AuthService<CS, PH, TI>
where
    CS: CredentialStore,
    PH: PasswordHasher,
    TI: TokenIssuer,
{
    async fn create_user(&self, national_id: &str, password: SecretString) -> Result<(), AuthError> {
        let national_id = NationalId::new(national_id)?;
        let password = Password::new(password)?;

        match self.store.find_by_national_id(&national_id).await? {
            UserLookup::Found(_) => return Err(AuthError::UserAlreadyExists),
            UserLookup::NotFound => {}
        }

        let password_hash = self.hash_password(password).await?;

        let user = User {
            id: UserId::new(),
            national_id,
            password_hash,
            role: Role::User,
            created_at: Utc::now(),
        };
        let user_id = user.id;
        let masked = user.national_id.masked();

        match self.store.insert(user).await {
            Ok(()) => {
                tracing::info!(user_id = %user_id, national_id = %masked, "User registered");
                Ok(())
            }
            // Lost a race with a concurrent registration of the same national ID
            Err(InsertError::UniqueViolation(_)) => Err(AuthError::UserAlreadyExists),
            Err(InsertError::Store(e)) => Err(e.into()),
        }
    }

    async fn authenticate_user(
        &self,
        national_id: &str,
        password: SecretString,
    ) -> Result<AccessToken, AuthError> {
        let (Ok(national_id), Ok(password)) = (NationalId::new(national_id), Password::new(password))
        else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = match self.store.find_by_national_id(&national_id).await? {
            UserLookup::Found(user) => user,
            UserLookup::NotFound => {
                // Spend one hash so an unknown user costs about as much as a wrong password
                if let Err(e) = self.hash_password(password).await {
                    tracing::warn!(error = %e, "Equalising hash failed");
                }
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.verify_password(password, user.password_hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let subject = TokenSubject {
            national_id: user.national_id,
            role: self.settings.include_role_claim.then_some(user.role),
        };
        let token = self.issuer.issue(&subject, self.settings.token_ttl)?;

        tracing::info!(user_id = %user.id, national_id = %subject.national_id.masked(), "User authenticated");

        Ok(token)
    }
}

/// Log-safe form of a national ID that may not have been validated yet.
fn masked_input(national_id: &str) -> String {
    NationalId::new(national_id)
        .map(|id| id.masked())
        .unwrap_or_else(|_| "<malformed>".to_string())
}

/// The single log event for a failed request.
fn log_failure(request_type: &str, national_id: &str, err: &AuthError) {
    let national_id = masked_input(national_id);

    if err.is_infrastructure() {
        tracing::error!(
            request_type,
            national_id = %national_id,
            error = %err,
            "Request failed on infrastructure"
        );
    } else {
        tracing::info!(
            request_type,
            national_id = %national_id,
            status = err.status().code(),
            error = %err,
            "Request rejected"
        );
    }
}
