use crate::application::ports::cache::PageCacheInvalidator;
use crate::application::ports::repositories::{ThreadRepository, UserRepository};
use crate::application::services::ThreadService;
use crate::infrastructure::cache::InMemoryPageCache;
use crate::infrastructure::database::{ConnectionPool, Repository, SqliteRepository};
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Wires the storage, cache and service layers from a validated config.
pub struct AppContext {
    pub config: AppConfig,
    pub pool: ConnectionPool,
    pub repository: Arc<SqliteRepository>,
    pub cache: Arc<InMemoryPageCache>,
    pub thread_service: Arc<ThreadService>,
}

impl AppContext {
    pub async fn initialize(config: AppConfig) -> Result<Self, AppError> {
        config.validate().map_err(AppError::Configuration)?;

        let pool = ConnectionPool::new(&config.database)
            .await
            .map_err(AppError::from)?;

        let repository = Arc::new(SqliteRepository::new(pool.clone()));
        repository.initialize().await?;
        if !repository.health_check().await? {
            return Err(AppError::Database(
                "database failed its post-migration health check".to_string(),
            ));
        }
        info!(url = %config.database.url, "database ready");

        let cache = Arc::new(InMemoryPageCache::new());

        let thread_service = Arc::new(
            ThreadService::new(
                Arc::clone(&repository) as Arc<dyn ThreadRepository>,
                Arc::clone(&repository) as Arc<dyn UserRepository>,
                Arc::clone(&cache) as Arc<dyn PageCacheInvalidator>,
            )
            .with_default_page_size(config.feed.default_page_size),
        );

        Ok(Self {
            config,
            pool,
            repository,
            cache,
            thread_service,
        })
    }

    pub async fn shutdown(&self) {
        self.pool.close().await;
        info!("database connections closed");
    }
}
