//! Bookmark operations for an authenticated caller.
//!
//! Reads filter by owner, so a foreign id looks absent. Mutations load by
//! id and go through `ensure_owner`, so a foreign id is denied. The load,
//! check and write are separate store calls with no lock between them.

use tracing::info;

use crate::{
    bookmarks::{
        repo::BookmarkRepo,
        repo_types::{Bookmark, BookmarkPatch, NewBookmark},
    },
    error::AppError,
    ownership::ensure_owner,
};

pub async fn list(repo: &dyn BookmarkRepo, caller_id: i64) -> Result<Vec<Bookmark>, AppError> {
    Ok(repo.list_by_user(caller_id).await?)
}

pub async fn create(
    repo: &dyn BookmarkRepo,
    caller_id: i64,
    new: NewBookmark,
) -> Result<Bookmark, AppError> {
    let bookmark = repo.create(caller_id, new).await?;
    info!(user_id = caller_id, bookmark_id = bookmark.id, "bookmark created");
    Ok(bookmark)
}

pub async fn get(
    repo: &dyn BookmarkRepo,
    caller_id: i64,
    id: i64,
) -> Result<Option<Bookmark>, AppError> {
    Ok(repo.find_owned(id, caller_id).await?)
}

pub async fn edit(
    repo: &dyn BookmarkRepo,
    caller_id: i64,
    id: i64,
    patch: BookmarkPatch,
) -> Result<Bookmark, AppError> {
    ensure_owner(repo.find_by_id(id).await?, caller_id)?;
    // A concurrent delete between check and write leaves nothing to update.
    let updated = repo.update(id, patch).await?.ok_or(AppError::AccessDenied)?;
    info!(user_id = caller_id, bookmark_id = id, "bookmark edited");
    Ok(updated)
}

pub async fn delete(repo: &dyn BookmarkRepo, caller_id: i64, id: i64) -> Result<(), AppError> {
    ensure_owner(repo.find_by_id(id).await?, caller_id)?;
    if !repo.delete(id).await? {
        return Err(AppError::AccessDenied);
    }
    info!(user_id = caller_id, bookmark_id = id, "bookmark deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const ALICE: i64 = 1;
    const BOB: i64 = 2;

    fn new_bookmark(title: &str) -> NewBookmark {
        NewBookmark {
            title: title.into(),
            link: "https://x".into(),
            description: None,
        }
    }

    #[tokio::test]
    async fn list_is_owner_filtered() {
        let store = MemoryStore::new();
        for i in 0..3 {
            create(&store, ALICE, new_bookmark(&format!("t{i}"))).await.unwrap();
        }
        assert_eq!(list(&store, ALICE).await.unwrap().len(), 3);
        assert!(list(&store, BOB).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_by_foreign_id_is_absent_not_denied() {
        let store = MemoryStore::new();
        let b = create(&store, ALICE, new_bookmark("t")).await.unwrap();

        assert_eq!(get(&store, ALICE, b.id).await.unwrap(), Some(b.clone()));
        assert_eq!(get(&store, BOB, b.id).await.unwrap(), None);
        assert_eq!(get(&store, ALICE, b.id + 100).await.unwrap(), None);
    }

    #[tokio::test]
    async fn owner_can_edit_partially() {
        let store = MemoryStore::new();
        let b = create(&store, ALICE, new_bookmark("t")).await.unwrap();

        let patch = BookmarkPatch {
            description: Some("d".into()),
            ..Default::default()
        };
        let edited = edit(&store, ALICE, b.id, patch).await.unwrap();
        assert_eq!(edited.title, "t");
        assert_eq!(edited.description.as_deref(), Some("d"));
        assert_eq!(edited.user_id, ALICE);
    }

    #[tokio::test]
    async fn foreign_edit_and_delete_are_denied_and_leave_record_unchanged() {
        let store = MemoryStore::new();
        let b = create(&store, ALICE, new_bookmark("t")).await.unwrap();

        let patch = BookmarkPatch {
            title: Some("hijacked".into()),
            ..Default::default()
        };
        let err = edit(&store, BOB, b.id, patch).await.unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));

        let err = delete(&store, BOB, b.id).await.unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));

        assert_eq!(BookmarkRepo::find_by_id(&store, b.id).await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn missing_id_is_denied_like_foreign_id() {
        let store = MemoryStore::new();
        let err = edit(&store, ALICE, 404, BookmarkPatch::default()).await.unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));
        let err = delete(&store, ALICE, 404).await.unwrap_err();
        assert!(matches!(err, AppError::AccessDenied));
    }

    #[tokio::test]
    async fn delete_is_permanent() {
        let store = MemoryStore::new();
        let b = create(&store, ALICE, new_bookmark("t")).await.unwrap();
        delete(&store, ALICE, b.id).await.unwrap();
        assert!(list(&store, ALICE).await.unwrap().is_empty());
        assert!(matches!(
            delete(&store, ALICE, b.id).await.unwrap_err(),
            AppError::AccessDenied
        ));
    }

    // Not an invariant: two edits racing on one bookmark both pass the
    // ownership check and the store applies them in arbitrary order. All we
    // can assert is that one of them won.
    #[tokio::test]
    async fn concurrent_edits_are_last_write_wins() {
        let store = MemoryStore::new();
        let b = create(&store, ALICE, new_bookmark("t")).await.unwrap();

        let first = BookmarkPatch {
            title: Some("first".into()),
            ..Default::default()
        };
        let second = BookmarkPatch {
            title: Some("second".into()),
            ..Default::default()
        };
        let (r1, r2) = tokio::join!(
            edit(&store, ALICE, b.id, first),
            edit(&store, ALICE, b.id, second)
        );
        assert!(r1.is_ok() && r2.is_ok());

        let stored = BookmarkRepo::find_by_id(&store, b.id).await.unwrap().unwrap();
        assert!(stored.title == "first" || stored.title == "second");
    }
}
