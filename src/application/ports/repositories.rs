use crate::domain::entities::{Thread, User};
use crate::shared::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait ThreadRepository: Send + Sync {
    async fn create_thread(&self, thread: &Thread) -> Result<(), AppError>;
    async fn get_thread(&self, id: &str) -> Result<Option<Thread>, AppError>;
    /// Resolves ids in the requested order; dangling ids are skipped.
    async fn get_threads_by_ids(&self, ids: &[String]) -> Result<Vec<Thread>, AppError>;
    /// Top-level threads, newest first.
    async fn list_top_level(&self, skip: u64, limit: u32) -> Result<Vec<Thread>, AppError>;
    async fn count_top_level(&self) -> Result<u64, AppError>;
    /// Persists the thread's `children` sequence (the only field a stored
    /// thread is ever updated with).
    async fn update_children(&self, thread: &Thread) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<(), AppError>;
    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>, AppError>;
    /// Appends a thread id to the user's authored-thread sequence.
    /// Fails with `NotFound` when the user does not exist.
    async fn append_thread_ref(&self, user_id: &str, thread_id: &str) -> Result<(), AppError>;
}
