pub mod application;
pub mod context;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::services::{FeedPage, FeedQuery, ThreadService};
pub use context::AppContext;
pub use domain::entities::{AuthorSummary, ReplyView, Thread, ThreadView, User};
pub use shared::{AppConfig, AppError, Result};

/// Installs the global tracing subscriber. `RUST_LOG` overrides the
/// default filter.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weft=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
