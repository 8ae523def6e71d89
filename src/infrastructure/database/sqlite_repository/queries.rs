pub(super) const INSERT_THREAD: &str = r#"
    INSERT INTO threads (id, text, author_id, parent_id, community_id, children, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub(super) const SELECT_THREAD_BY_ID: &str = r#"
    SELECT id, text, author_id, parent_id, community_id, children, created_at
    FROM threads
    WHERE id = ?1
"#;

pub(super) const SELECT_TOP_LEVEL_THREADS: &str = r#"
    SELECT id, text, author_id, parent_id, community_id, children, created_at
    FROM threads
    WHERE parent_id IS NULL
    ORDER BY created_at DESC
    LIMIT ?1 OFFSET ?2
"#;

pub(super) const COUNT_TOP_LEVEL_THREADS: &str = r#"
    SELECT COUNT(*) AS total
    FROM threads
    WHERE parent_id IS NULL
"#;

pub(super) const UPDATE_THREAD_CHILDREN: &str = r#"
    UPDATE threads
    SET children = ?2
    WHERE id = ?1
"#;

pub(super) const INSERT_USER: &str = r#"
    INSERT INTO users (id, name, image, threads, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub(super) const SELECT_USER_BY_ID: &str = r#"
    SELECT id, name, image, threads, created_at, updated_at
    FROM users
    WHERE id = ?1
"#;

pub(super) const UPDATE_USER_THREADS: &str = r#"
    UPDATE users
    SET threads = ?2,
        updated_at = ?3
    WHERE id = ?1
"#;
