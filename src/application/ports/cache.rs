use async_trait::async_trait;

/// Page-cache invalidation port. Given a logical path, marks every cached
/// render under it stale; fire-and-forget from the caller's perspective.
#[async_trait]
pub trait PageCacheInvalidator: Send + Sync {
    async fn invalidate(&self, path: &str);
}
