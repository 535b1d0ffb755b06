use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::ownership::OwnedResource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl OwnedResource for Bookmark {
    fn owner_id(&self) -> i64 {
        self.user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BookmarkPatch {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}
