use async_trait::async_trait;
use sqlx::PgPool;

use crate::store::StoreResult;
use crate::users::repo_types::{NewUser, User, UserPatch};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a user; a taken email yields `StoreError::UniqueViolation`.
    async fn create(&self, new: NewUser) -> StoreResult<User>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>>;
    async fn update(&self, id: i64, patch: UserPatch) -> StoreResult<Option<User>>;
}

#[async_trait]
impl UserRepo for PgPool {
    async fn create(&self, new: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, first_name, last_name, created_at, updated_at
            "#,
        )
        .bind(&new.email)
        .bind(&new.password_hash)
        .fetch_one(self)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: i64, patch: UserPatch) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET email      = COALESCE($2, email),
                   first_name = COALESCE($3, first_name),
                   last_name  = COALESCE($4, last_name),
                   updated_at = now()
             WHERE id = $1
            RETURNING id, email, password_hash, first_name, last_name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.email)
        .bind(patch.first_name)
        .bind(patch.last_name)
        .fetch_optional(self)
        .await?;
        Ok(user)
    }
}
