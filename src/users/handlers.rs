use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{AuthUser, AuthUserId},
    error::AppError,
    state::AppState,
    store::StoreError,
    users::{dto::EditUserRequest, repo_types::User, repo_types::UserPatch},
    validation::{normalize_email, PatchJson},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(get_me))
        .route("/users", patch(edit_user))
}

/// Full record of the token subject.
#[instrument(skip(state, auth))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<User>, AppError> {
    let user = state.users.find_by_id(auth.sub).await?.ok_or_else(|| {
        warn!(user_id = auth.sub, "token subject no longer exists");
        AppError::Unauthenticated("user not found")
    })?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn edit_user(
    State(state): State<AppState>,
    AuthUserId(user_id): AuthUserId,
    PatchJson(payload): PatchJson<EditUserRequest>,
) -> Result<Json<User>, AppError> {
    let patch = UserPatch {
        email: payload.email.as_deref().map(normalize_email),
        first_name: payload.first_name,
        last_name: payload.last_name,
    };

    let user = match state.users.update(user_id, patch).await {
        Ok(Some(u)) => u,
        Ok(None) => return Err(AppError::Unauthenticated("user not found")),
        Err(StoreError::UniqueViolation) => {
            warn!(user_id, "edit to an email already in use");
            return Err(AppError::DuplicateIdentity);
        }
        Err(e) => return Err(e.into()),
    };

    info!(user_id, "user edited");
    Ok(Json(user))
}
