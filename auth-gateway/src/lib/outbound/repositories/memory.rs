use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::errors::InsertError;
use crate::domain::user::errors::StoreError;
use crate::domain::user::models::NationalId;
use crate::domain::user::models::User;
use crate::domain::user::models::UserLookup;
use crate::domain::user::ports::CredentialStore;

/// Credential store kept in process memory.
///
/// The uniqueness check and the write happen under one lock, which gives the same
/// guarantee as the `users.national_id` unique constraint.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<NationalId, User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_national_id(
        &self,
        national_id: &NationalId,
    ) -> Result<UserLookup, StoreError> {
        let users = self.users.read().await;

        Ok(match users.get(national_id) {
            Some(user) => UserLookup::Found(user.clone()),
            None => UserLookup::NotFound,
        })
    }

    async fn insert(&self, user: User) -> Result<(), InsertError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.national_id) {
            return Err(InsertError::UniqueViolation(
                "users_national_id_key".to_string(),
            ));
        }
        users.insert(user.national_id.clone(), user);

        Ok(())
    }
}
