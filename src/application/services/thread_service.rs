use crate::application::ports::cache::PageCacheInvalidator;
use crate::application::ports::repositories::{ThreadRepository, UserRepository};
use crate::domain::entities::{AuthorSummary, ReplyView, Thread, ThreadView};
use crate::shared::error::AppError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reply levels populated below a fetched thread: children and
/// grandchildren, never further.
pub const REPLY_POPULATE_DEPTH: usize = 2;

/// Reply levels populated below each feed entry.
const FEED_REPLY_DEPTH: usize = 1;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone)]
pub struct FeedQuery {
    /// 1-based; values below 1 are treated as page 1.
    pub page_number: u32,
    /// `None` falls back to the service's configured default.
    pub page_size: Option<u32>,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeedPage {
    pub posts: Vec<ThreadView>,
    pub is_next: bool,
}

/// The thread access facade: every operation is a sequence of awaited
/// store calls with no transaction spanning them. Partial multi-step
/// writes are not compensated; the documented baseline is the store's
/// per-statement atomicity.
pub struct ThreadService {
    threads: Arc<dyn ThreadRepository>,
    users: Arc<dyn UserRepository>,
    cache: Arc<dyn PageCacheInvalidator>,
    default_page_size: u32,
}

impl ThreadService {
    pub fn new(
        threads: Arc<dyn ThreadRepository>,
        users: Arc<dyn UserRepository>,
        cache: Arc<dyn PageCacheInvalidator>,
    ) -> Self {
        Self {
            threads,
            users,
            cache,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the page size used when a [`FeedQuery`] does not carry
    /// one, typically from `FeedConfig`.
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Creates a top-level post and backlinks it from its author.
    ///
    /// The insert and the author update are sequential; if the backlink
    /// fails the thread row already exists and is not rolled back.
    pub async fn create_thread(
        &self,
        text: String,
        author_id: &str,
        community_id: Option<String>,
        path: &str,
    ) -> Result<Thread, AppError> {
        // Accepted for call compatibility but stored as NULL.
        // TODO: persist community_id and append the thread to the
        // community's feed once a community repository exists.
        let _ = community_id;

        let thread = Thread::new(text, author_id.to_string());

        self.threads
            .create_thread(&thread)
            .await
            .map_err(creation_error)?;
        self.users
            .append_thread_ref(author_id, &thread.id)
            .await
            .map_err(creation_error)?;

        self.invalidate(path).await;
        Ok(thread)
    }

    /// One page of the global feed: top-level threads, newest first, each
    /// with its full author and one level of replies. Threads whose author
    /// row cannot be resolved are omitted from the page, not an error.
    pub async fn fetch_posts(&self, query: FeedQuery) -> Result<FeedPage, AppError> {
        let page_size = query.page_size.unwrap_or(self.default_page_size);
        let page_number = u64::from(query.page_number.max(1));
        let skip = (page_number - 1) * u64::from(page_size);

        let records = self
            .threads
            .list_top_level(skip, page_size)
            .await
            .map_err(query_error)?;
        let total = self.threads.count_top_level().await.map_err(query_error)?;

        let returned = records.len() as u64;
        let is_next = total > skip + returned;

        let mut posts = Vec::with_capacity(records.len());
        for record in records {
            if let Some(view) = self.populate_thread(record, FEED_REPLY_DEPTH).await? {
                posts.push(view);
            }
        }

        Ok(FeedPage { posts, is_next })
    }

    /// Fetches one thread with replies populated to
    /// [`REPLY_POPULATE_DEPTH`] levels. An unknown id is `None`, not an
    /// error; so is a thread whose author row cannot be resolved.
    pub async fn fetch_thread_by_id(&self, id: &str) -> Result<Option<ThreadView>, AppError> {
        let Some(record) = self.threads.get_thread(id).await.map_err(query_error)? else {
            return Ok(None);
        };
        self.populate_thread(record, REPLY_POPULATE_DEPTH).await
    }

    /// Appends a comment to an existing thread.
    ///
    /// The comment row carries `parent_id` before the parent's `children`
    /// sequence is updated, so a direct read of the comment always sees
    /// correct ancestry; if the parent update fails the comment stays
    /// invisible via population until retried.
    pub async fn add_comment_to_thread(
        &self,
        thread_id: &str,
        comment_text: String,
        user_id: &str,
        path: &str,
    ) -> Result<Thread, AppError> {
        let mut parent = self
            .threads
            .get_thread(thread_id)
            .await
            .map_err(creation_error)?
            .ok_or_else(|| AppError::NotFound(format!("thread {thread_id} not found")))?;

        let comment = Thread::new_reply(comment_text, user_id.to_string(), thread_id.to_string());
        self.threads
            .create_thread(&comment)
            .await
            .map_err(creation_error)?;

        parent.add_child(comment.id.clone());
        self.threads
            .update_children(&parent)
            .await
            .map_err(creation_error)?;

        // Ancestry does not depend on the author backlink, so a failure
        // here keeps the comment readable and is only logged.
        if let Err(err) = self.users.append_thread_ref(user_id, &comment.id).await {
            warn!(
                comment_id = %comment.id,
                "comment kept without author backlink: {err}"
            );
        }

        self.invalidate(path).await;
        Ok(comment)
    }

    async fn invalidate(&self, path: &str) {
        debug!(path, "invalidating cached renders");
        self.cache.invalidate(path).await;
    }

    /// `None` when the author row is unresolvable. Threads without a
    /// persisted author backlink are an accepted partial-write state, so
    /// one such row must not poison a whole read.
    async fn populate_thread(
        &self,
        record: Thread,
        reply_depth: usize,
    ) -> Result<Option<ThreadView>, AppError> {
        let Some(author) = self
            .users
            .get_user(&record.author_id)
            .await
            .map_err(query_error)?
        else {
            warn!(
                thread_id = %record.id,
                author_id = %record.author_id,
                "skipping thread with unresolvable author"
            );
            return Ok(None);
        };

        let children = self.populate_replies(&record.children, reply_depth).await?;

        Ok(Some(ThreadView {
            id: record.id,
            text: record.text,
            author,
            parent_id: record.parent_id,
            community_id: record.community_id,
            created_at: record.created_at,
            children,
        }))
    }

    /// Resolves a `children` id sequence into populated replies, recursing
    /// until `depth` is exhausted. Below the cut-off, reply ids stay
    /// unresolved and the subtree is empty.
    fn populate_replies<'a>(
        &'a self,
        ids: &'a [String],
        depth: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ReplyView>, AppError>> + Send + 'a>> {
        Box::pin(async move {
            if depth == 0 || ids.is_empty() {
                return Ok(Vec::new());
            }

            let records = self
                .threads
                .get_threads_by_ids(ids)
                .await
                .map_err(query_error)?;

            let author_ids: Vec<String> =
                records.iter().map(|r| r.author_id.clone()).collect();
            let authors = self
                .users
                .get_users_by_ids(&author_ids)
                .await
                .map_err(query_error)?;
            let summaries: HashMap<String, AuthorSummary> = authors
                .into_iter()
                .map(|user| (user.id.clone(), user.summary()))
                .collect();

            let mut replies = Vec::with_capacity(records.len());
            for record in records {
                let Some(author) = summaries.get(&record.author_id).cloned() else {
                    warn!(
                        reply_id = %record.id,
                        author_id = %record.author_id,
                        "skipping reply with unresolvable author"
                    );
                    continue;
                };
                let children = self.populate_replies(&record.children, depth - 1).await?;
                replies.push(ReplyView {
                    id: record.id,
                    text: record.text,
                    author,
                    parent_id: record.parent_id,
                    created_at: record.created_at,
                    children,
                });
            }

            Ok(replies)
        })
    }
}

/// Write failures keep their `NotFound` identity; everything else becomes
/// a creation wrapper carrying the original message.
fn creation_error(err: AppError) -> AppError {
    match err {
        AppError::NotFound(_) => err,
        other => AppError::Creation(other.to_string()),
    }
}

fn query_error(err: AppError) -> AppError {
    match err {
        AppError::NotFound(_) => err,
        other => AppError::Query(other.to_string()),
    }
}
