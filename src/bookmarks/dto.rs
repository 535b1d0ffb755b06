use serde::Deserialize;

use crate::bookmarks::repo_types::{BookmarkPatch, NewBookmark};
use crate::validation::Validate;

#[derive(Debug, Deserialize)]
pub struct CreateBookmarkRequest {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
}

impl Validate for CreateBookmarkRequest {
    fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title should not be empty".into());
        }
        if self.link.trim().is_empty() {
            return Err("link should not be empty".into());
        }
        Ok(())
    }
}

impl From<CreateBookmarkRequest> for NewBookmark {
    fn from(r: CreateBookmarkRequest) -> Self {
        Self {
            title: r.title,
            link: r.link,
            description: r.description,
        }
    }
}

/// Partial edit; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct EditBookmarkRequest {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

impl Validate for EditBookmarkRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl From<EditBookmarkRequest> for BookmarkPatch {
    fn from(r: EditBookmarkRequest) -> Self {
        Self {
            title: r.title,
            link: r.link,
            description: r.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_title_and_link() {
        let ok: CreateBookmarkRequest =
            serde_json::from_str(r#"{"title":"t","link":"https://x"}"#).unwrap();
        assert!(ok.validate().is_ok());
        assert!(ok.description.is_none());

        let blank: CreateBookmarkRequest =
            serde_json::from_str(r#"{"title":" ","link":"https://x"}"#).unwrap();
        assert!(blank.validate().is_err());

        assert!(serde_json::from_str::<CreateBookmarkRequest>(r#"{"title":"t"}"#).is_err());
    }
}
