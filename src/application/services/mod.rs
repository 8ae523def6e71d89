pub mod thread_service;

pub use thread_service::{FeedPage, FeedQuery, ThreadService};
