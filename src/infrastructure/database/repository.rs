use crate::application::ports::repositories::{ThreadRepository, UserRepository};
use crate::shared::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait Repository: ThreadRepository + UserRepository {
    async fn initialize(&self) -> Result<(), AppError>;
    async fn health_check(&self) -> Result<bool, AppError>;
}
