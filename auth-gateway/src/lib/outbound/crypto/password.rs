use auth::HashingParams;

use crate::domain::user::errors::PasswordError;
use crate::domain::user::models::Password;
use crate::domain::user::models::PasswordHash;
use crate::domain::user::ports::PasswordHasher;

impl From<auth::PasswordError> for PasswordError {
    fn from(err: auth::PasswordError) -> Self {
        match err {
            auth::PasswordError::VerificationFailed(msg) => PasswordError::VerificationFailed(msg),
            other => PasswordError::HashingFailed(other.to_string()),
        }
    }
}

/// Argon2id hashing backed by the shared `auth` library.
pub struct Argon2PasswordHasher {
    inner: auth::PasswordHasher,
}

impl Argon2PasswordHasher {
    /// Build a hasher with the configured work factor.
    ///
    /// # Errors
    /// * `HashingFailed` - Parameters are rejected by Argon2
    pub fn new(params: HashingParams) -> Result<Self, PasswordError> {
        Ok(Self {
            inner: auth::PasswordHasher::with_params(params)?,
        })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordError> {
        Ok(PasswordHash::new(self.inner.hash(password.expose())?))
    }

    fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<bool, PasswordError> {
        Ok(self.inner.verify(password.expose(), hash.as_str())?)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::new(HashingParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn password(value: &str) -> Password {
        Password::new(SecretString::new(value.to_string())).unwrap()
    }

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let hasher = hasher();

        let first = hasher.hash(&password("secret123")).unwrap();
        let second = hasher.hash(&password("secret123")).unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify(&password("secret123"), &first).unwrap());
        assert!(hasher.verify(&password("secret123"), &second).unwrap());
        assert!(!hasher.verify(&password("wrong"), &first).unwrap());
    }

    #[test]
    fn test_malformed_stored_hash_is_an_error() {
        let result = hasher().verify(
            &password("secret123"),
            &PasswordHash::new("not-a-phc-string".to_string()),
        );
        assert!(matches!(result, Err(PasswordError::VerificationFailed(_))));
    }
}
