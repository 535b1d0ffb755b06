use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    auth::{
        dto::{AuthRequest, AuthResponse},
        services,
    },
    error::AppError,
    state::AppState,
    validation::ValidatedJson,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let access_token =
        services::signup(state.users.as_ref(), &state.jwt, &payload.email, payload.password).await?;
    Ok((StatusCode::CREATED, Json(AuthResponse { access_token })))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let access_token =
        services::signin(state.users.as_ref(), &state.jwt, &payload.email, payload.password).await?;
    Ok(Json(AuthResponse { access_token }))
}
