use crate::domain::entities::{Thread, User};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use sqlx::{Row, sqlite::SqliteRow};

pub(super) fn map_thread_row(row: &SqliteRow) -> Result<Thread, AppError> {
    let created_at: i64 = row.try_get("created_at")?;
    let children_json: String = row.try_get("children").unwrap_or_default();

    Ok(Thread::new_with_id(
        row.try_get("id")?,
        row.try_get("text")?,
        row.try_get("author_id")?,
        row.try_get("parent_id")?,
        row.try_get("community_id")?,
        parse_id_list(&children_json),
        DateTime::from_timestamp_millis(created_at).unwrap_or_else(Utc::now),
    ))
}

pub(super) fn map_user_row(row: &SqliteRow) -> Result<User, AppError> {
    let created_at: i64 = row.try_get("created_at")?;
    let updated_at: i64 = row.try_get("updated_at")?;
    let threads_json: String = row.try_get("threads").unwrap_or_default();

    Ok(User::new_with_id(
        row.try_get("id")?,
        row.try_get("name")?,
        row.try_get("image")?,
        parse_id_list(&threads_json),
        DateTime::from_timestamp_millis(created_at).unwrap_or_else(Utc::now),
        DateTime::from_timestamp_millis(updated_at).unwrap_or_else(Utc::now),
    ))
}

pub(super) fn parse_id_list(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

pub(super) fn encode_id_list(ids: &[String]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}
