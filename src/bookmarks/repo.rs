use async_trait::async_trait;
use sqlx::PgPool;

use crate::bookmarks::repo_types::{Bookmark, BookmarkPatch, NewBookmark};
use crate::store::StoreResult;

#[async_trait]
pub trait BookmarkRepo: Send + Sync {
    async fn list_by_user(&self, user_id: i64) -> StoreResult<Vec<Bookmark>>;
    async fn create(&self, user_id: i64, new: NewBookmark) -> StoreResult<Bookmark>;
    /// Lookup filtered by owner: a foreign id is simply absent.
    async fn find_owned(&self, id: i64, user_id: i64) -> StoreResult<Option<Bookmark>>;
    /// Unfiltered lookup, used ahead of the ownership check on mutations.
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Bookmark>>;
    async fn update(&self, id: i64, patch: BookmarkPatch) -> StoreResult<Option<Bookmark>>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

#[async_trait]
impl BookmarkRepo for PgPool {
    async fn list_by_user(&self, user_id: i64) -> StoreResult<Vec<Bookmark>> {
        let rows = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, description, link, created_at, updated_at
            FROM bookmarks
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(self)
        .await?;
        Ok(rows)
    }

    async fn create(&self, user_id: i64, new: NewBookmark) -> StoreResult<Bookmark> {
        let row = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (user_id, title, description, link)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, link, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.link)
        .fetch_one(self)
        .await?;
        Ok(row)
    }

    async fn find_owned(&self, id: i64, user_id: i64) -> StoreResult<Option<Bookmark>> {
        let row = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, description, link, created_at, updated_at
            FROM bookmarks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self)
        .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Bookmark>> {
        let row = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, description, link, created_at, updated_at
            FROM bookmarks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, patch: BookmarkPatch) -> StoreResult<Option<Bookmark>> {
        let row = sqlx::query_as::<_, Bookmark>(
            r#"
            UPDATE bookmarks
               SET title       = COALESCE($2, title),
                   link        = COALESCE($3, link),
                   description = COALESCE($4, description),
                   updated_at  = now()
             WHERE id = $1
            RETURNING id, user_id, title, description, link, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.link)
        .bind(patch.description)
        .fetch_optional(self)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = $1")
            .bind(id)
            .execute(self)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
