//! In-process store used by `STORE_BACKEND=memory` and by tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::bookmarks::repo::BookmarkRepo;
use crate::bookmarks::repo_types::{Bookmark, BookmarkPatch, NewBookmark};
use crate::store::{StoreError, StoreResult};
use crate::users::repo::UserRepo;
use crate::users::repo_types::{NewUser, User, UserPatch};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    bookmarks: BTreeMap<i64, Bookmark>,
    next_user_id: i64,
    next_bookmark_id: i64,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(&self, new: NewUser) -> StoreResult<User> {
        let mut t = self.inner.write().await;
        if t.email_taken(&new.email, None) {
            return Err(StoreError::UniqueViolation);
        }
        t.next_user_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: t.next_user_id,
            email: new.email,
            password_hash: new.password_hash,
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
        };
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let t = self.inner.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn update(&self, id: i64, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut t = self.inner.write().await;
        if let Some(email) = &patch.email {
            if t.email_taken(email, Some(id)) {
                return Err(StoreError::UniqueViolation);
            }
        }
        let Some(user) = t.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(first_name) = patch.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = Some(last_name);
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl BookmarkRepo for MemoryStore {
    async fn list_by_user(&self, user_id: i64) -> StoreResult<Vec<Bookmark>> {
        let t = self.inner.read().await;
        Ok(t.bookmarks
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, user_id: i64, new: NewBookmark) -> StoreResult<Bookmark> {
        let mut t = self.inner.write().await;
        t.next_bookmark_id += 1;
        let now = OffsetDateTime::now_utc();
        let bookmark = Bookmark {
            id: t.next_bookmark_id,
            user_id,
            title: new.title,
            description: new.description,
            link: new.link,
            created_at: now,
            updated_at: now,
        };
        t.bookmarks.insert(bookmark.id, bookmark.clone());
        Ok(bookmark)
    }

    async fn find_owned(&self, id: i64, user_id: i64) -> StoreResult<Option<Bookmark>> {
        let t = self.inner.read().await;
        Ok(t.bookmarks.get(&id).filter(|b| b.user_id == user_id).cloned())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Bookmark>> {
        Ok(self.inner.read().await.bookmarks.get(&id).cloned())
    }

    async fn update(&self, id: i64, patch: BookmarkPatch) -> StoreResult<Option<Bookmark>> {
        let mut t = self.inner.write().await;
        let Some(b) = t.bookmarks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            b.title = title;
        }
        if let Some(link) = patch.link {
            b.link = link;
        }
        if let Some(description) = patch.description {
            b.description = Some(description);
        }
        b.updated_at = OffsetDateTime::now_utc();
        Ok(Some(b.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.inner.write().await.bookmarks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let store = MemoryStore::new();
        UserRepo::create(&store, new_user("a@x.com")).await.unwrap();
        let err = UserRepo::create(&store, new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));
        assert_eq!(store.inner.read().await.users.len(), 1);
    }

    #[tokio::test]
    async fn update_to_foreign_email_is_rejected() {
        let store = MemoryStore::new();
        UserRepo::create(&store, new_user("a@x.com")).await.unwrap();
        let b = UserRepo::create(&store, new_user("b@x.com")).await.unwrap();

        let patch = UserPatch {
            email: Some("a@x.com".into()),
            ..Default::default()
        };
        let err = UserRepo::update(&store, b.id, patch).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation));

        // Re-submitting your own email is fine.
        let same = UserPatch {
            email: Some("b@x.com".into()),
            first_name: Some("Bee".into()),
            ..Default::default()
        };
        let updated = UserRepo::update(&store, b.id, same).await.unwrap().unwrap();
        assert_eq!(updated.first_name.as_deref(), Some("Bee"));
    }

    #[tokio::test]
    async fn ids_are_generated_in_order() {
        let store = MemoryStore::new();
        let new = || NewBookmark {
            title: "t".into(),
            link: "https://x".into(),
            description: None,
        };
        let first = BookmarkRepo::create(&store, 1, new()).await.unwrap();
        let second = BookmarkRepo::create(&store, 1, new()).await.unwrap();
        assert!(second.id > first.id);

        let listed = store.list_by_user(1).await.unwrap();
        assert_eq!(listed, vec![first, second]);
    }
}
