use super::SqliteRepository;
use super::mapper::{encode_id_list, map_user_row};
use super::queries::{INSERT_USER, SELECT_USER_BY_ID, UPDATE_USER_THREADS};
use crate::application::ports::repositories::UserRepository;
use crate::domain::entities::User;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use std::collections::HashMap;

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(INSERT_USER)
            .bind(&user.id)
            .bind(&user.name)
            .bind(user.image.as_deref())
            .bind(encode_id_list(&user.threads))
            .bind(user.created_at.timestamp_millis())
            .bind(user.updated_at.timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;

        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(SELECT_USER_BY_ID)
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;

        match row {
            Some(row) => Ok(Some(map_user_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, name, image, threads, created_at, updated_at \
             FROM users WHERE id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        builder.push(")");

        let rows = builder.build().fetch_all(self.pool.get_pool()).await?;

        let mut by_id = HashMap::with_capacity(rows.len());
        for row in rows {
            let user = map_user_row(&row)?;
            by_id.insert(user.id.clone(), user);
        }

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn append_thread_ref(&self, user_id: &str, thread_id: &str) -> Result<(), AppError> {
        let mut user = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))?;

        user.add_thread_ref(thread_id.to_string());

        sqlx::query(UPDATE_USER_THREADS)
            .bind(user_id)
            .bind(encode_id_list(&user.threads))
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::SqliteRepository;
    use crate::application::ports::repositories::UserRepository;
    use crate::domain::entities::User;
    use crate::infrastructure::database::{ConnectionPool, Repository};
    use crate::shared::error::AppError;

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

    #[tokio::test]
    async fn user_roundtrip_preserves_fields() {
        let repository = setup_repository().await;

        let user = User::new("alice".to_string()).with_image("https://img.test/a".to_string());
        repository.create_user(&user).await.expect("create");

        let stored = repository
            .get_user(&user.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(stored.name, "alice");
        assert_eq!(stored.image.as_deref(), Some("https://img.test/a"));
        assert!(stored.threads.is_empty());
    }

    #[tokio::test]
    async fn append_thread_ref_accumulates_in_order() {
        let repository = setup_repository().await;

        let user = User::new("alice".to_string());
        repository.create_user(&user).await.expect("create");

        repository
            .append_thread_ref(&user.id, "t1")
            .await
            .expect("first append");
        repository
            .append_thread_ref(&user.id, "t2")
            .await
            .expect("second append");

        let stored = repository
            .get_user(&user.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(stored.threads, vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn append_thread_ref_for_unknown_user_is_not_found() {
        let repository = setup_repository().await;

        let err = repository
            .append_thread_ref("nobody", "t1")
            .await
            .expect_err("missing user");
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_users_by_ids_skips_unknown_ids() {
        let repository = setup_repository().await;

        let alice = User::new("alice".to_string());
        let bob = User::new("bob".to_string());
        repository.create_user(&alice).await.expect("create alice");
        repository.create_user(&bob).await.expect("create bob");

        let ids = vec![bob.id.clone(), "missing".to_string(), alice.id.clone()];
        let found = repository.get_users_by_ids(&ids).await.expect("lookup");
        let names: Vec<&str> = found.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["bob", "alice"]);
    }
}
