use super::SqliteRepository;
use super::mapper::{encode_id_list, map_thread_row};
use super::queries::{
    COUNT_TOP_LEVEL_THREADS, INSERT_THREAD, SELECT_THREAD_BY_ID, SELECT_TOP_LEVEL_THREADS,
    UPDATE_THREAD_CHILDREN,
};
use crate::application::ports::repositories::ThreadRepository;
use crate::domain::entities::Thread;
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Row, Sqlite};
use std::collections::HashMap;

#[async_trait]
impl ThreadRepository for SqliteRepository {
    async fn create_thread(&self, thread: &Thread) -> Result<(), AppError> {
        sqlx::query(INSERT_THREAD)
            .bind(&thread.id)
            .bind(&thread.text)
            .bind(&thread.author_id)
            .bind(thread.parent_id.as_deref())
            .bind(thread.community_id.as_deref())
            .bind(encode_id_list(&thread.children))
            .bind(thread.created_at.timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;

        Ok(())
    }

    async fn get_thread(&self, id: &str) -> Result<Option<Thread>, AppError> {
        let row = sqlx::query(SELECT_THREAD_BY_ID)
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;

        match row {
            Some(row) => Ok(Some(map_thread_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Results keep the order of `ids`; unknown ids are skipped.
    async fn get_threads_by_ids(&self, ids: &[String]) -> Result<Vec<Thread>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, text, author_id, parent_id, community_id, children, created_at \
             FROM threads WHERE id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        builder.push(")");

        let rows = builder.build().fetch_all(self.pool.get_pool()).await?;

        let mut by_id = HashMap::with_capacity(rows.len());
        for row in rows {
            let thread = map_thread_row(&row)?;
            by_id.insert(thread.id.clone(), thread);
        }

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn list_top_level(&self, skip: u64, limit: u32) -> Result<Vec<Thread>, AppError> {
        let rows = sqlx::query(SELECT_TOP_LEVEL_THREADS)
            .bind(i64::from(limit))
            .bind(skip as i64)
            .fetch_all(self.pool.get_pool())
            .await?;

        let mut threads = Vec::with_capacity(rows.len());
        for row in rows {
            threads.push(map_thread_row(&row)?);
        }

        Ok(threads)
    }

    async fn count_top_level(&self) -> Result<u64, AppError> {
        let row = sqlx::query(COUNT_TOP_LEVEL_THREADS)
            .fetch_one(self.pool.get_pool())
            .await?;
        let total: i64 = row.try_get("total")?;
        Ok(total.max(0) as u64)
    }

    async fn update_children(&self, thread: &Thread) -> Result<(), AppError> {
        let result = sqlx::query(UPDATE_THREAD_CHILDREN)
            .bind(&thread.id)
            .bind(encode_id_list(&thread.children))
            .execute(self.pool.get_pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("thread {} not found", thread.id)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::SqliteRepository;
    use crate::application::ports::repositories::ThreadRepository;
    use crate::domain::entities::Thread;
    use crate::infrastructure::database::{ConnectionPool, Repository};
    use crate::shared::error::AppError;
    use chrono::{TimeZone, Utc};

    async fn setup_repository() -> SqliteRepository {
        let pool = ConnectionPool::from_memory()
            .await
            .expect("failed to create pool");
        let repository = SqliteRepository::new(pool);
        repository
            .initialize()
            .await
            .expect("failed to run migrations");
        repository
    }

    fn sample_thread(text: &str) -> Thread {
        Thread::new(text.to_string(), "author-1".to_string())
    }

    #[tokio::test]
    async fn thread_roundtrip_preserves_all_fields() {
        let repository = setup_repository().await;

        let mut thread = sample_thread("hello");
        thread.children = vec!["c1".to_string(), "c2".to_string()];
        repository.create_thread(&thread).await.expect("create");

        let stored = repository
            .get_thread(&thread.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(stored.text, "hello");
        assert_eq!(stored.author_id, "author-1");
        assert!(stored.parent_id.is_none());
        assert!(stored.community_id.is_none());
        assert_eq!(stored.children, vec!["c1", "c2"]);
        assert_eq!(
            stored.created_at.timestamp_millis(),
            thread.created_at.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn get_threads_by_ids_preserves_request_order() {
        let repository = setup_repository().await;

        let a = sample_thread("a");
        let b = sample_thread("b");
        let c = sample_thread("c");
        for thread in [&a, &b, &c] {
            repository.create_thread(thread).await.expect("create");
        }

        let ids = vec![c.id.clone(), "missing".to_string(), a.id.clone()];
        let found = repository.get_threads_by_ids(&ids).await.expect("lookup");
        let texts: Vec<&str> = found.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "a"]);
    }

    #[tokio::test]
    async fn get_threads_by_ids_with_no_ids_skips_the_query() {
        let repository = setup_repository().await;
        let found = repository.get_threads_by_ids(&[]).await.expect("lookup");
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn list_top_level_applies_skip_and_limit() {
        let repository = setup_repository().await;

        for i in 0..5 {
            let mut thread = sample_thread(&format!("t{i}"));
            thread.created_at = Utc.timestamp_opt(100 + i, 0).unwrap();
            repository.create_thread(&thread).await.expect("create");
        }
        let mut reply = Thread::new_reply(
            "reply".to_string(),
            "author-1".to_string(),
            "some-parent".to_string(),
        );
        reply.created_at = Utc.timestamp_opt(999, 0).unwrap();
        repository.create_thread(&reply).await.expect("create reply");

        let page = repository.list_top_level(2, 2).await.expect("list");
        let texts: Vec<&str> = page.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["t2", "t1"]);

        assert_eq!(repository.count_top_level().await.expect("count"), 5);
    }

    #[tokio::test]
    async fn update_children_of_missing_thread_is_not_found() {
        let repository = setup_repository().await;

        let thread = sample_thread("ghost");
        let err = repository
            .update_children(&thread)
            .await
            .expect_err("missing row");
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
