//! DuckDB-backed posts store
//!
//! Keeps posts in a DuckDB table (file or in-memory). Keyset filters,
//! ordering and windows are pushed down into SQL.

use crate::error::{Error, Result};
use crate::posts::Post;
use crate::store::{FindOptions, IdFilter, RecordStore};
use crate::types::RecordId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use duckdb::{params, params_from_iter, Connection, Row};
use std::path::Path;
use tokio::sync::Mutex;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS post_ids (last_id BIGINT NOT NULL);
INSERT INTO post_ids SELECT 0 WHERE NOT EXISTS (SELECT 1 FROM post_ids);
CREATE TABLE IF NOT EXISTS posts (
    id BIGINT PRIMARY KEY,
    author_id BIGINT NOT NULL,
    title VARCHAR NOT NULL,
    content VARCHAR NOT NULL,
    image VARCHAR,
    like_count BIGINT NOT NULL DEFAULT 0,
    comment_count BIGINT NOT NULL DEFAULT 0,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);
";

const COLUMNS: &str = "id, author_id, title, content, image, like_count, comment_count, \
                       epoch_us(created_at), epoch_us(updated_at)";

/// Posts store on a DuckDB connection
pub struct DatabaseStore {
    /// DuckDB connection
    conn: Mutex<Connection>,
    /// Database file, or ":memory:"
    location: String,
}

impl std::fmt::Debug for DatabaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl DatabaseStore {
    /// Open an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::store(format!("Failed to create DuckDB connection: {e}")))?;
        Self::init(conn, ":memory:".to_string())
    }

    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            Error::store(format!("Failed to open DuckDB at {}: {e}", path.display()))
        })?;
        Self::init(conn, path.display().to_string())
    }

    /// Create the schema if needed
    fn init(conn: Connection, location: String) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| Error::store(format!("Failed to create posts schema: {e}")))?;

        tracing::debug!("Opened posts database at {}", location);

        Ok(Self {
            conn: Mutex::new(conn),
            location,
        })
    }

    /// Database file, or ":memory:"
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Test database connection
    pub async fn check_connection(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("SELECT 1", [])
            .map_err(|e| Error::store(format!("Connection check failed: {e}")))?;
        Ok(())
    }
}

// ============================================================================
// SQL building
// ============================================================================

/// WHERE clause and its parameters for a keyset filter
fn where_clause(filter: IdFilter) -> (&'static str, Vec<i64>) {
    match filter {
        IdFilter::Any => ("", Vec::new()),
        IdFilter::LessThan(id) => (" WHERE id < ?", vec![id]),
        IdFilter::MoreThan(id) => (" WHERE id > ?", vec![id]),
    }
}

/// SELECT for a find call
fn select_query(options: &FindOptions) -> (String, Vec<i64>) {
    let (clause, mut values) = where_clause(options.filter);
    let direction = options.order.as_str();
    let mut sql =
        format!("SELECT {COLUMNS} FROM posts{clause} ORDER BY created_at {direction}, id {direction}");

    if let Some(take) = options.take {
        sql.push_str(" LIMIT ?");
        values.push(i64::try_from(take).unwrap_or(i64::MAX));
    }
    if options.skip > 0 {
        sql.push_str(" OFFSET ?");
        values.push(i64::try_from(options.skip).unwrap_or(i64::MAX));
    }

    (sql, values)
}

/// Raw row as read from DuckDB
struct PostRow {
    id: i64,
    author_id: i64,
    title: String,
    content: String,
    image: Option<String>,
    like_count: i64,
    comment_count: i64,
    created_us: i64,
    updated_us: i64,
}

impl PostRow {
    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            author_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            image: row.get(4)?,
            like_count: row.get(5)?,
            comment_count: row.get(6)?,
            created_us: row.get(7)?,
            updated_us: row.get(8)?,
        })
    }

    fn into_post(self) -> Result<Post> {
        Ok(Post {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            content: self.content,
            image: self.image,
            like_count: self.like_count,
            comment_count: self.comment_count,
            created_at: micros_to_datetime(self.created_us)?,
            updated_at: micros_to_datetime(self.updated_us)?,
        })
    }
}

fn micros_to_datetime(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| Error::store(format!("Timestamp out of range: {micros}")))
}

fn query_posts(conn: &Connection, sql: &str, values: &[i64]) -> Result<Vec<Post>> {
    tracing::debug!("Executing query: {}", sql);

    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| Error::store(format!("Failed to prepare query: {e}")))?;

    let rows = stmt
        .query_map(params_from_iter(values.iter().copied()), PostRow::from_row)
        .map_err(|e| Error::store(format!("Failed to query posts: {e}")))?;

    rows.map(|row| {
        row.map_err(|e| Error::store(format!("Failed to read post row: {e}")))
            .and_then(PostRow::into_post)
    })
    .collect()
}

fn insert_post(conn: &Connection, post: &Post) -> Result<()> {
    conn.execute(
        "INSERT INTO posts VALUES (?, ?, ?, ?, ?, ?, ?, make_timestamp(?), make_timestamp(?))",
        params![
            post.id,
            post.author_id,
            post.title,
            post.content,
            post.image,
            post.like_count,
            post.comment_count,
            post.created_at.timestamp_micros(),
            post.updated_at.timestamp_micros()
        ],
    )
    .map_err(|e| Error::store(format!("Failed to insert post: {e}")))?;
    Ok(())
}

fn update_post(conn: &Connection, post: &Post) -> Result<usize> {
    conn.execute(
        "UPDATE posts SET author_id = ?, title = ?, content = ?, image = ?, like_count = ?, \
         comment_count = ?, created_at = make_timestamp(?), updated_at = make_timestamp(?) \
         WHERE id = ?",
        params![
            post.author_id,
            post.title,
            post.content,
            post.image,
            post.like_count,
            post.comment_count,
            post.created_at.timestamp_micros(),
            post.updated_at.timestamp_micros(),
            post.id
        ],
    )
    .map_err(|e| Error::store(format!("Failed to update post {}: {e}", post.id)))
}

// ============================================================================
// RecordStore
// ============================================================================

#[async_trait]
impl RecordStore<Post> for DatabaseStore {
    async fn find(&self, options: &FindOptions) -> Result<Vec<Post>> {
        let (sql, values) = select_query(options);
        let conn = self.conn.lock().await;
        query_posts(&conn, &sql, &values)
    }

    async fn find_and_count(&self, options: &FindOptions) -> Result<(Vec<Post>, u64)> {
        let (sql, values) = select_query(options);
        let (clause, count_values) = where_clause(options.filter);
        let count_sql = format!("SELECT COUNT(*) FROM posts{clause}");

        let conn = self.conn.lock().await;
        let posts = query_posts(&conn, &sql, &values)?;
        let total: i64 = conn
            .query_row(&count_sql, params_from_iter(count_values), |row| row.get(0))
            .map_err(|e| Error::store(format!("Failed to count posts: {e}")))?;

        Ok((posts, total.max(0) as u64))
    }

    async fn find_one(&self, id: RecordId) -> Result<Option<Post>> {
        let sql = format!("SELECT {COLUMNS} FROM posts WHERE id = ?");
        let conn = self.conn.lock().await;
        Ok(query_posts(&conn, &sql, &[id])?.into_iter().next())
    }

    async fn save(&self, mut post: Post) -> Result<Post> {
        let conn = self.conn.lock().await;

        if post.id <= 0 {
            post.id = next_id(&conn)?;
            insert_post(&conn, &post)?;
        } else if update_post(&conn, &post)? == 0 {
            insert_post(&conn, &post)?;
            reserve_id(&conn, post.id)?;
        }

        Ok(post)
    }

    async fn delete(&self, id: RecordId) -> Result<bool> {
        let conn = self.conn.lock().await;
        let deleted = conn
            .execute("DELETE FROM posts WHERE id = ?", params![id])
            .map_err(|e| Error::store(format!("Failed to delete post {id}: {e}")))?;
        Ok(deleted > 0)
    }
}

/// Allocate the id after the highest one handed out or saved
fn next_id(conn: &Connection) -> Result<RecordId> {
    conn.execute("UPDATE post_ids SET last_id = last_id + 1", [])
        .and_then(|_| conn.query_row("SELECT last_id FROM post_ids", [], |row| row.get(0)))
        .map_err(|e| Error::store(format!("Failed to allocate post id: {e}")))
}

/// Keep later allocations above an explicitly saved id
fn reserve_id(conn: &Connection, id: RecordId) -> Result<()> {
    conn.execute(
        "UPDATE post_ids SET last_id = greatest(last_id, ?)",
        params![id],
    )
    .map_err(|e| Error::store(format!("Failed to reserve post id {id}: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::SortDirection;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn post_at(minute: i64) -> Post {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Post::new_at(7, format!("post {minute}"), "body", base + Duration::minutes(minute))
    }

    async fn seeded(count: i64) -> DatabaseStore {
        let store = DatabaseStore::open_in_memory().unwrap();
        for minute in 0..count {
            store.save(post_at(minute)).await.unwrap();
        }
        store
    }

    fn ids(posts: &[Post]) -> Vec<i64> {
        posts.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_select_query_shapes() {
        let (sql, values) = select_query(&FindOptions::new());
        assert!(sql.ends_with("ORDER BY created_at ASC, id ASC"));
        assert!(values.is_empty());

        let (sql, values) = select_query(
            &FindOptions::new()
                .with_filter(IdFilter::LessThan(9))
                .ordered(SortDirection::Desc)
                .skip(4)
                .take(2),
        );
        assert!(sql.contains(" WHERE id < ?"));
        assert!(sql.contains("ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"));
        assert_eq!(values, vec![9, 2, 4]);
    }

    #[tokio::test]
    async fn test_check_connection() {
        let store = DatabaseStore::open_in_memory().unwrap();
        assert!(store.check_connection().await.is_ok());
        assert_eq!(store.location(), ":memory:");
    }

    #[tokio::test]
    async fn test_save_and_find_one_round_trip() {
        let store = DatabaseStore::open_in_memory().unwrap();
        let saved = store
            .save(post_at(0).with_image("cat.png"))
            .await
            .unwrap();
        assert_eq!(saved.id, 1);

        let loaded = store.find_one(1).await.unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert!(store.find_one(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_existing_updates() {
        let store = seeded(2).await;
        let mut post = store.find_one(2).await.unwrap().unwrap();
        post.title = "edited".to_string();
        post.like_count = 3;
        store.save(post).await.unwrap();

        let loaded = store.find_one(2).await.unwrap().unwrap();
        assert_eq!(loaded.title, "edited");
        assert_eq!(loaded.like_count, 3);
        assert_eq!(store.find(&FindOptions::new()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_explicit_id_advances_allocation() {
        let store = seeded(2).await;
        let mut explicit = post_at(5);
        explicit.id = 50;
        store.save(explicit).await.unwrap();

        let next = store.save(post_at(6)).await.unwrap();
        assert_eq!(next.id, 51);

        // Lower explicit ids leave the counter alone
        let mut low = post_at(7);
        low.id = 10;
        store.save(low).await.unwrap();
        assert!(store.delete(51).await.unwrap());
        assert_eq!(store.save(post_at(8)).await.unwrap().id, 52);
    }

    #[tokio::test]
    async fn test_keyset_find() {
        let store = seeded(10).await;

        let page = store
            .find(&FindOptions::new().with_filter(IdFilter::MoreThan(3)).take(3))
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![4, 5, 6]);

        let page = store
            .find(
                &FindOptions::new()
                    .with_filter(IdFilter::LessThan(4))
                    .ordered(SortDirection::Desc)
                    .take(3),
            )
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_find_and_count() {
        let store = seeded(10).await;
        let (page, total) = store
            .find_and_count(&FindOptions::new().skip(3).take(3))
            .await
            .unwrap();
        assert_eq!(ids(&page), vec![4, 5, 6]);
        assert_eq!(total, 10);

        let (page, total) = store
            .find_and_count(&FindOptions::new().skip(12).take(3))
            .await
            .unwrap();
        assert!(page.is_empty());
        assert_eq!(total, 10);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = seeded(3).await;
        assert!(store.delete(2).await.unwrap());
        assert!(!store.delete(2).await.unwrap());
        let remaining = store.find(&FindOptions::new()).await.unwrap();
        assert_eq!(ids(&remaining), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.duckdb");

        {
            let store = DatabaseStore::open(&path).unwrap();
            store.save(post_at(0)).await.unwrap();
        }

        let store = DatabaseStore::open(&path).unwrap();
        let posts = store.find(&FindOptions::new()).await.unwrap();
        assert_eq!(ids(&posts), vec![1]);
        let next = store.save(post_at(1)).await.unwrap();
        assert_eq!(next.id, 2);
    }
}
