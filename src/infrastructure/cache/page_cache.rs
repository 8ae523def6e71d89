use crate::application::ports::cache::PageCacheInvalidator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default, Clone)]
struct PageState {
    invalidations: u64,
    stale: bool,
}

/// In-process page cache bookkeeping. Tracks which rendered paths have
/// been invalidated since they were last marked fresh.
pub struct InMemoryPageCache {
    entries: Arc<RwLock<HashMap<String, PageState>>>,
}

impl InMemoryPageCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// True once `invalidate` has been called for the path and no
    /// `mark_fresh` followed.
    pub async fn is_stale(&self, path: &str) -> bool {
        let entries = self.entries.read().await;
        entries.get(path).map(|state| state.stale).unwrap_or(false)
    }

    /// Called by whoever re-renders the path.
    pub async fn mark_fresh(&self, path: &str) {
        let mut entries = self.entries.write().await;
        if let Some(state) = entries.get_mut(path) {
            state.stale = false;
        }
    }

    pub async fn invalidation_count(&self, path: &str) -> u64 {
        let entries = self.entries.read().await;
        entries
            .get(path)
            .map(|state| state.invalidations)
            .unwrap_or(0)
    }

    pub async fn invalidated_paths(&self) -> Vec<String> {
        let entries = self.entries.read().await;
        entries.keys().cloned().collect()
    }
}

impl Default for InMemoryPageCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageCacheInvalidator for InMemoryPageCache {
    async fn invalidate(&self, path: &str) {
        let mut entries = self.entries.write().await;
        let state = entries.entry(path.to_string()).or_default();
        state.invalidations += 1;
        state.stale = true;
        debug!(path, invalidations = state.invalidations, "page invalidated");
    }
}
