use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::AuthUserId,
    bookmarks::{
        dto::{CreateBookmarkRequest, EditBookmarkRequest},
        repo_types::Bookmark,
        services,
    },
    error::AppError,
    state::AppState,
    validation::{IdParam, PatchJson, ValidatedJson},
};

pub fn bookmark_routes() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", get(list_bookmarks).post(create_bookmark))
        .route(
            "/bookmarks/:id",
            get(get_bookmark).patch(edit_bookmark).delete(delete_bookmark),
        )
}

#[instrument(skip(state))]
pub async fn list_bookmarks(
    State(state): State<AppState>,
    AuthUserId(user_id): AuthUserId,
) -> Result<Json<Vec<Bookmark>>, AppError> {
    Ok(Json(services::list(state.bookmarks.as_ref(), user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_bookmark(
    State(state): State<AppState>,
    AuthUserId(user_id): AuthUserId,
    ValidatedJson(payload): ValidatedJson<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>), AppError> {
    let bookmark = services::create(state.bookmarks.as_ref(), user_id, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// Absent and foreign ids both answer 200 with `null`.
#[instrument(skip(state))]
pub async fn get_bookmark(
    State(state): State<AppState>,
    AuthUserId(user_id): AuthUserId,
    IdParam(id): IdParam,
) -> Result<Json<Option<Bookmark>>, AppError> {
    Ok(Json(services::get(state.bookmarks.as_ref(), user_id, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn edit_bookmark(
    State(state): State<AppState>,
    AuthUserId(user_id): AuthUserId,
    IdParam(id): IdParam,
    PatchJson(payload): PatchJson<EditBookmarkRequest>,
) -> Result<Json<Bookmark>, AppError> {
    let bookmark = services::edit(state.bookmarks.as_ref(), user_id, id, payload.into()).await?;
    Ok(Json(bookmark))
}

#[instrument(skip(state))]
pub async fn delete_bookmark(
    State(state): State<AppState>,
    AuthUserId(user_id): AuthUserId,
    IdParam(id): IdParam,
) -> Result<StatusCode, AppError> {
    services::delete(state.bookmarks.as_ref(), user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
