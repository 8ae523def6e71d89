use super::user::{AuthorSummary, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post or reply as stored. A reply is a thread whose `parent_id`
/// references another thread; `children` keeps the ordered ids of its
/// direct replies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Thread {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub parent_id: Option<String>,
    pub community_id: Option<String>,
    pub children: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    pub fn new(text: String, author_id: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            author_id,
            parent_id: None,
            community_id: None,
            children: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn new_reply(text: String, author_id: String, parent_id: String) -> Self {
        let mut thread = Self::new(text, author_id);
        thread.parent_id = Some(parent_id);
        thread
    }

    /// Rehydrates a stored row; never assigns a fresh id.
    #[allow(clippy::too_many_arguments)]
    pub fn new_with_id(
        id: String,
        text: String,
        author_id: String,
        parent_id: Option<String>,
        community_id: Option<String>,
        children: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text,
            author_id,
            parent_id,
            community_id,
            children,
            created_at,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn add_child(&mut self, child_id: String) {
        self.children.push(child_id);
    }
}

/// A thread with its references resolved: full author projection at the
/// root, replies populated to a bounded depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadView {
    pub id: String,
    pub text: String,
    pub author: User,
    pub parent_id: Option<String>,
    pub community_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub children: Vec<ReplyView>,
}

/// A populated reply. Authors below the root carry only the restricted
/// projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyView {
    pub id: String,
    pub text: String,
    pub author: AuthorSummary,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub children: Vec<ReplyView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_thread_is_top_level() {
        let thread = Thread::new("hello".into(), "user-1".into());
        assert!(thread.is_top_level());
        assert!(thread.children.is_empty());
        assert!(thread.community_id.is_none());
    }

    #[test]
    fn reply_carries_parent_id() {
        let reply = Thread::new_reply("hi".into(), "user-1".into(), "thread-1".into());
        assert_eq!(reply.parent_id.as_deref(), Some("thread-1"));
        assert!(!reply.is_top_level());
    }

    #[test]
    fn add_child_preserves_order() {
        let mut thread = Thread::new("root".into(), "user-1".into());
        thread.add_child("a".into());
        thread.add_child("b".into());
        assert_eq!(thread.children, vec!["a".to_string(), "b".to_string()]);
    }
}
