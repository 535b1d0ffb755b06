//! Signup and signin. Each call ends in exactly one issued token or
//! exactly one failure.

use tracing::{info, warn};

use crate::{
    auth::{jwt::JwtKeys, password},
    error::AppError,
    store::StoreError,
    users::{repo::UserRepo, repo_types::NewUser},
    validation::normalize_email,
};

pub async fn signup(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    email: &str,
    password: String,
) -> Result<String, AppError> {
    let email = normalize_email(email);

    let password_hash = password::hash(password).await?;

    let user = match users.create(NewUser { email, password_hash }).await {
        Ok(u) => u,
        Err(StoreError::UniqueViolation) => {
            warn!("signup with existing email");
            return Err(AppError::DuplicateIdentity);
        }
        Err(e) => return Err(e.into()),
    };

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = user.id, "user signed up");
    Ok(token)
}

pub async fn signin(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    email: &str,
    password: String,
) -> Result<String, AppError> {
    let email = normalize_email(email);

    let Some(user) = users.find_by_email(&email).await? else {
        warn!("signin unknown email");
        return Err(AppError::IdentityNotFound);
    };

    if !password::verify(user.password_hash.clone(), password).await? {
        warn!(user_id = user.id, "signin invalid password");
        return Err(AppError::InvalidCredential);
    }

    let token = keys.sign(user.id, &user.email)?;
    info!(user_id = user.id, "user signed in");
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::JwtConfig, store::MemoryStore};

    fn keys() -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: "test-secret".into(),
        })
    }

    #[tokio::test]
    async fn signin_after_signup_yields_same_subject() {
        let store = MemoryStore::new();
        let keys = keys();

        let t1 = signup(&store, &keys, "a@x.com", "123".into()).await.expect("signup");
        let t2 = signin(&store, &keys, "a@x.com", "123".into()).await.expect("signin");

        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(keys.verify(&t1).unwrap().sub, user.id);
        assert_eq!(keys.verify(&t2).unwrap().sub, user.id);
        assert_ne!(user.password_hash, "123");
    }

    #[tokio::test]
    async fn duplicate_signup_creates_no_second_user() {
        let store = MemoryStore::new();
        let keys = keys();
        signup(&store, &keys, "a@x.com", "123".into()).await.unwrap();

        let err = signup(&store, &keys, "a@x.com", "other".into()).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateIdentity));

        // Original credentials still hold.
        signin(&store, &keys, "a@x.com", "123".into()).await.expect("first user intact");
        assert!(signin(&store, &keys, "a@x.com", "other".into()).await.is_err());
    }

    #[tokio::test]
    async fn email_is_case_insensitive() {
        let store = MemoryStore::new();
        let keys = keys();
        signup(&store, &keys, " A@X.com", "123".into()).await.unwrap();
        signin(&store, &keys, "a@x.COM", "123".into()).await.expect("normalized lookup");
        let err = signup(&store, &keys, "a@x.com", "123".into()).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateIdentity));
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_fail_alike() {
        let store = MemoryStore::new();
        let keys = keys();
        signup(&store, &keys, "a@x.com", "123".into()).await.unwrap();

        let unknown = signin(&store, &keys, "b@x.com", "123".into()).await.unwrap_err();
        let wrong = signin(&store, &keys, "a@x.com", "1234".into()).await.unwrap_err();
        assert!(matches!(unknown, AppError::IdentityNotFound));
        assert!(matches!(wrong, AppError::InvalidCredential));
        assert_eq!(unknown.status_code(), wrong.status_code());
        assert_eq!(unknown.error_code(), wrong.error_code());
        assert_eq!(unknown.to_string(), wrong.to_string());
    }
}
