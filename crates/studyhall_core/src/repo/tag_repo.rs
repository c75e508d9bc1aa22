//! Tag repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide title lookup and get-or-create persistence for shared tags.
//!
//! # Invariants
//! - Tag titles are unique and case-sensitive; no normalization happens
//!   here.
//! - `get_or_create` never produces two rows with the same title, even
//!   under concurrent callers (unique constraint + `INSERT OR IGNORE`).

use crate::model::tag::Tag;
use crate::repo::{ensure_settings_schema, RepoError, RepoResult};
use rusqlite::{Connection, OptionalExtension};

/// Repository interface for shared tag records.
pub trait TagRepository {
    /// Finds one tag by exact title.
    fn find_by_title(&self, title: &str) -> RepoResult<Option<Tag>>;

    /// Returns the tag with the given title, creating it when absent.
    fn get_or_create(&self, title: &str) -> RepoResult<Tag>;

    /// Lists all known tag titles sorted ascending.
    fn list_titles(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_settings_schema(conn)?;
        Ok(Self { conn })
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn find_by_title(&self, title: &str) -> RepoResult<Option<Tag>> {
        let tag = self
            .conn
            .query_row(
                "SELECT id, title FROM tags WHERE title = ?1;",
                [title],
                |row| {
                    Ok(Tag {
                        id: row.get("id")?,
                        title: row.get("title")?,
                    })
                },
            )
            .optional()?;
        Ok(tag)
    }

    fn get_or_create(&self, title: &str) -> RepoResult<Tag> {
        // Losing the insert race to another connection is fine: the
        // follow-up lookup returns the winner's row either way.
        self.conn
            .execute("INSERT OR IGNORE INTO tags (title) VALUES (?1);", [title])?;

        self.find_by_title(title)?.ok_or_else(|| {
            RepoError::InvalidData(format!("tag `{title}` missing after get-or-create"))
        })
    }

    fn list_titles(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title FROM tags ORDER BY title ASC;")?;
        let mut rows = stmt.query([])?;
        let mut titles = Vec::new();
        while let Some(row) = rows.next()? {
            titles.push(row.get::<_, String>(0)?);
        }
        Ok(titles)
    }
}
