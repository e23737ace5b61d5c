use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::errors::InsertError;
use crate::domain::user::errors::StoreError;
use crate::domain::user::models::NationalId;
use crate::domain::user::models::PasswordHash;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserLookup;
use crate::domain::user::ports::CredentialStore;

/// Credential store over the `users` table.
///
/// Every query borrows a connection from the pool for its own duration only, so
/// connections go back to the pool on every exit path.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    national_id: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            national_id: NationalId::new(&row.national_id)
                .map_err(|e| StoreError(format!("Corrupt national_id for {}: {}", row.id, e)))?,
            password_hash: PasswordHash::new(row.password_hash),
            role: row
                .role
                .parse()
                .map_err(|e| StoreError(format!("Corrupt role for {}: {}", row.id, e)))?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_national_id(
        &self,
        national_id: &NationalId,
    ) -> Result<UserLookup, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, national_id, password_hash, role, created_at
            FROM users
            WHERE national_id = $1
            "#,
        )
        .bind(national_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError(e.to_string()))?;

        match row {
            Some(r) => Ok(UserLookup::Found(r.try_into()?)),
            None => Ok(UserLookup::NotFound),
        }
    }

    async fn insert(&self, user: User) -> Result<(), InsertError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, national_id, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.0)
        .bind(user.national_id.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return InsertError::UniqueViolation(
                        db_err.constraint().unwrap_or("users_national_id_key").to_string(),
                    );
                }
            }
            InsertError::Store(StoreError(e.to_string()))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::models::Role;

    fn row(national_id: &str, role: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            national_id: national_id.to_string(),
            password_hash: "$argon2id$stored_hash".to_string(),
            role: role.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_row_converts() {
        let row = row("12345678900", "ADMIN");
        let (id, created_at) = (row.id, row.created_at);

        let user = User::try_from(row).unwrap();

        assert_eq!(user.id, UserId(id));
        assert_eq!(user.national_id.as_str(), "12345678900");
        assert_eq!(user.password_hash.as_str(), "$argon2id$stored_hash");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.created_at, created_at);
    }

    #[test]
    fn test_corrupt_national_id_is_store_error() {
        let err = User::try_from(row("1234", "USER")).unwrap_err();
        assert!(err.0.contains("Corrupt national_id"));
    }

    #[test]
    fn test_corrupt_role_is_store_error() {
        let err = User::try_from(row("12345678900", "superuser")).unwrap_err();
        assert!(err.0.contains("Corrupt role"));
    }
}
