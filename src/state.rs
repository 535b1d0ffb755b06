use crate::auth::JwtKeys;
use crate::bookmarks::repo::BookmarkRepo;
use crate::config::{AppConfig, StoreBackend};
use crate::store::{self, MemoryStore};
use crate::users::repo::UserRepo;
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub bookmarks: Arc<dyn BookmarkRepo>,
    pub jwt: JwtKeys,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let jwt = JwtKeys::new(&config.jwt);

        let (users, bookmarks) = match config.store {
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL must be set")?;
                let db = store::connect(url, config.database_max_connections).await?;
                store::migrate(&db).await?;
                tracing::info!("using postgres store");
                (
                    Arc::new(db.clone()) as Arc<dyn UserRepo>,
                    Arc::new(db) as Arc<dyn BookmarkRepo>,
                )
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; data is lost on restart");
                let mem = Arc::new(MemoryStore::new());
                (
                    mem.clone() as Arc<dyn UserRepo>,
                    mem as Arc<dyn BookmarkRepo>,
                )
            }
        };

        Ok(Self {
            users,
            bookmarks,
            jwt,
            config,
        })
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::JwtConfig;

        let config = Arc::new(AppConfig {
            store: StoreBackend::Memory,
            database_url: None,
            database_max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: "test".into(),
            },
        });
        let jwt = JwtKeys::new(&config.jwt);
        let mem = Arc::new(MemoryStore::new());

        Self {
            users: mem.clone(),
            bookmarks: mem,
            jwt,
            config,
        }
    }
}
