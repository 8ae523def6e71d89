pub mod connection_pool;
pub mod repository;
pub mod sqlite_repository;

pub use connection_pool::ConnectionPool;
pub use repository::Repository;
pub use sqlite_repository::SqliteRepository;
