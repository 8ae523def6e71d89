use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account data is owned elsewhere; this is the projection the thread
/// facade reads, plus the authored-thread backlinks it maintains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub threads: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Restricted author projection used when populating replies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

impl User {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            image: None,
            threads: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_image(mut self, image: String) -> Self {
        self.image = Some(image);
        self
    }

    pub fn new_with_id(
        id: String,
        name: String,
        image: Option<String>,
        threads: Vec<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            image,
            threads,
            created_at,
            updated_at,
        }
    }

    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }

    pub fn add_thread_ref(&mut self, thread_id: String) {
        self.threads.push(thread_id);
        self.updated_at = Utc::now();
    }
}
