use crate::state::AppState;
use axum::Router;

pub mod claims;
mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
mod password;
pub mod services;

pub use extractors::{AuthUser, AuthUserId};
pub use jwt::JwtKeys;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}
