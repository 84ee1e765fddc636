//! SQLite-backed blog post service.
//!
//! # Responsibility
//! - Persist posts in the `blog_posts` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every write runs in its own transaction and is visible only after
//!   `commit()`. A failed statement rolls back when the transaction drops.
//! - Ids come from SQLite `AUTOINCREMENT` and are never reused.
//! - Read paths reject rows that cannot be mapped back to a post.

use crate::db::{open_db, open_db_in_memory};
use crate::model::blog_post::{BlogPost, BlogPostId};
use crate::service::blog_post_service::{BlogPostService, ServiceError, ServiceResult};
use log::{debug, warn};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const POST_SELECT_SQL: &str = "SELECT id, title, author, content FROM blog_posts";

/// Database-backed blog post store.
pub struct DatabaseBlogPostService {
    conn: Mutex<Connection>,
}

impl DatabaseBlogPostService {
    /// Opens (or creates) a database file with the current schema.
    pub fn open(path: impl AsRef<Path>) -> ServiceResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a private in-memory database with the current schema.
    pub fn open_in_memory() -> ServiceResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Adopts a connection returned by `db::open_db*`.
    ///
    /// The connection must already carry the `blog_posts` schema.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Runs `f` against the underlying connection.
    ///
    /// Intended for tests that need to inspect or seed the table directly.
    pub fn with_connection<T, E>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> ServiceResult<T>
    where
        E: Into<ServiceError>,
    {
        let conn = self.lock()?;
        f(&conn).map_err(Into::into)
    }

    /// Deletes every row and restarts id assignment at 1.
    pub fn reset(&self) -> ServiceResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM blog_posts;", [])?;
        tx.execute(
            "DELETE FROM sqlite_sequence WHERE name = 'blog_posts';",
            [],
        )?;
        tx.commit()?;
        debug!("event=store_reset module=service store=database status=ok");
        Ok(())
    }

    fn lock(&self) -> ServiceResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| ServiceError::Poisoned)
    }
}

impl BlogPostService for DatabaseBlogPostService {
    fn get_all(&self) -> ServiceResult<Vec<BlogPost>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{POST_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut posts = Vec::new();

        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }

        Ok(posts)
    }

    fn get_by_id(&self, id: BlogPostId) -> ServiceResult<Option<BlogPost>> {
        let conn = self.lock()?;
        find_post(&conn, id)
    }

    fn insert(&self, mut post: BlogPost) -> ServiceResult<BlogPost> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO blog_posts (title, author, content) VALUES (?1, ?2, ?3);",
            params![post.title, post.author, post.content],
        )?;
        post.id = tx.last_insert_rowid();
        tx.commit()?;

        debug!(
            "event=post_insert module=service store=database status=ok id={}",
            post.id
        );
        Ok(post)
    }

    fn update(&self, post: &BlogPost) -> ServiceResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE blog_posts SET title = ?1, author = ?2, content = ?3 WHERE id = ?4;",
            params![post.title, post.author, post.content, post.id],
        )?;

        if changed == 0 {
            return Err(ServiceError::NotFound(post.id));
        }

        tx.commit()?;
        Ok(())
    }

    fn delete(&self, id: BlogPostId) -> ServiceResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let changed = tx.execute("DELETE FROM blog_posts WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(ServiceError::NotFound(id));
        }

        tx.commit()?;
        Ok(())
    }
}

fn parse_post_row(row: &Row<'_>) -> ServiceResult<BlogPost> {
    let id: BlogPostId = row.get("id")?;
    if id <= 0 {
        warn!("event=row_parse module=service store=database status=error id={id}");
        return Err(ServiceError::InvalidData(format!(
            "invalid id `{id}` in blog_posts.id"
        )));
    }

    Ok(BlogPost {
        id,
        title: row.get("title")?,
        author: row.get("author")?,
        content: row.get("content")?,
    })
}

/// Returns the number of stored rows.
///
/// Lets callers count posts without materializing them.
pub fn count_posts(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM blog_posts;", [], |row| row.get(0))
}

/// Primary-key lookup straight against `conn`, bypassing the service lock.
pub fn find_post(conn: &Connection, id: BlogPostId) -> ServiceResult<Option<BlogPost>> {
    let mut stmt = conn.prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_post_row(row)?));
    }

    Ok(None)
}
