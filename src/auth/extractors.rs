use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{claims::Claims, jwt::JwtKeys};
use crate::error::AppError;

/// Verified bearer token claims. Handlers taking this never run for an
/// unauthenticated request.
pub struct AuthUser(pub Claims);

/// Just the `sub` claim of a verified token.
pub struct AuthUserId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthenticated("missing Authorization header"))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(AppError::Unauthenticated("invalid auth scheme"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token.trim()).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthenticated("invalid or expired token")
        })?;

        Ok(AuthUser(claims))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUserId
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        Ok(AuthUserId(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/users/me");
        if let Some(value) = header {
            builder = builder.header(axum::http::header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let state = AppState::fake();
        let mut parts = parts_with(None);
        let err = AuthUser::from_request_parts(&mut parts, &state).await.err().unwrap();
        assert!(matches!(err, AppError::Unauthenticated("missing Authorization header")));
    }

    #[tokio::test]
    async fn wrong_scheme_is_unauthenticated() {
        let state = AppState::fake();
        let token = state.jwt.sign(1, "a@x.com").unwrap();
        let mut parts = parts_with(Some(&format!("Basic {token}")));
        let err = AuthUser::from_request_parts(&mut parts, &state).await.err().unwrap();
        assert!(matches!(err, AppError::Unauthenticated("invalid auth scheme")));
    }

    #[tokio::test]
    async fn garbage_token_is_unauthenticated() {
        let state = AppState::fake();
        let mut parts = parts_with(Some("Bearer not.a.jwt"));
        let err = AuthUserId::from_request_parts(&mut parts, &state).await.err().unwrap();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn valid_token_projects_claims() {
        let state = AppState::fake();
        let token = state.jwt.sign(9, "me@x.com").unwrap();

        let mut parts = parts_with(Some(&format!("Bearer {token}")));
        let AuthUser(claims) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .ok()
            .unwrap();
        assert_eq!(claims.sub, 9);
        assert_eq!(claims.email, "me@x.com");

        let mut parts = parts_with(Some(&format!("Bearer {token}")));
        let AuthUserId(id) = AuthUserId::from_request_parts(&mut parts, &state)
            .await
            .ok()
            .unwrap();
        assert_eq!(id, 9);
    }
}
