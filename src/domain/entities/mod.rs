pub mod thread;
pub mod user;

pub use thread::{ReplyView, Thread, ThreadView};
pub use user::{AuthorSummary, User};
