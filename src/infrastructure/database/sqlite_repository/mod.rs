use super::ConnectionPool;
use super::Repository;
use crate::shared::error::AppError;
use async_trait::async_trait;

mod mapper;
mod queries;
mod threads;
mod users;

pub struct SqliteRepository {
    pool: ConnectionPool,
}

impl SqliteRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn initialize(&self) -> Result<(), AppError> {
        self.pool.migrate().await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        let result = sqlx::query("SELECT 1")
            .fetch_one(self.pool.get_pool())
            .await;
        Ok(result.is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_check_reports_ready_after_initialize() {
        let pool = ConnectionPool::from_memory()
            .await
            .expect("failed to create pool");
        let repository = SqliteRepository::new(pool);
        repository
            .initialize()
            .await
            .expect("failed to run migrations");

        assert!(repository.health_check().await.expect("health check"));
    }

    #[tokio::test]
    async fn health_check_reports_unhealthy_on_a_closed_pool() {
        let pool = ConnectionPool::from_memory()
            .await
            .expect("failed to create pool");
        let repository = SqliteRepository::new(pool.clone());
        repository
            .initialize()
            .await
            .expect("failed to run migrations");

        pool.close().await;
        assert!(!repository.health_check().await.expect("health check"));
    }
}
