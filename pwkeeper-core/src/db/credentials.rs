use rusqlite::{params, Row};

use super::Database;
use crate::error::Result;
use crate::models::{CreateCredentialInput, Credential};

const SELECT_COLUMNS: &str = "SELECT _id, title, email, password FROM passwords";

fn row_to_credential(row: &Row<'_>) -> rusqlite::Result<Credential> {
    // Rows written by older clients may carry NULLs.
    Ok(Credential {
        id: row.get(0)?,
        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        email: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        secret: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
    })
}

/// Build a `LIKE` pattern matching `query` as a literal substring.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Database {
    /// Store a new credential and return its id.
    pub fn insert_credential(&self, input: CreateCredentialInput) -> Result<i64> {
        let input = input.normalized()?;

        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO passwords (title, email, password) VALUES (?1, ?2, ?3)",
                params![input.title, input.email, input.secret],
            )?;
            let id = conn.last_insert_rowid();
            tracing::debug!(id, "Inserted credential");
            Ok(id)
        })
    }

    /// All credentials ordered by title.
    pub fn list_credentials(&self) -> Result<Vec<Credential>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY title, _id"))?;
            let rows = stmt.query_map([], row_to_credential)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    /// Credentials whose title contains `query`, ordered by title.
    ///
    /// Matching follows SQLite `LIKE`, so it ignores ASCII case.
    pub fn search_credentials(&self, query: &str) -> Result<Vec<Credential>> {
        let pattern = like_pattern(query);

        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{SELECT_COLUMNS} WHERE title LIKE ?1 ESCAPE '\\' ORDER BY title, _id"
            ))?;
            let rows = stmt.query_map(params![pattern], row_to_credential)?;
            Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
        })
    }

    pub fn get_credential(&self, id: i64) -> Result<Option<Credential>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE _id = ?1"))?;
            let mut rows = stmt.query_map(params![id], row_to_credential)?;
            Ok(rows.next().transpose()?)
        })
    }

    /// Delete one credential by id. Returns true if it existed.
    pub fn delete_credential(&self, id: i64) -> Result<bool> {
        self.with_connection(|conn| {
            let deleted = conn.execute("DELETE FROM passwords WHERE _id = ?1", params![id])?;
            tracing::debug!(id, deleted, "Deleted credential by id");
            Ok(deleted > 0)
        })
    }

    /// Delete every credential whose title equals `title` exactly.
    /// Returns the number of rows removed.
    pub fn delete_credentials_by_title(&self, title: &str) -> Result<usize> {
        self.with_connection(|conn| {
            let deleted = conn.execute("DELETE FROM passwords WHERE title = ?1", params![title])?;
            tracing::debug!(deleted, "Deleted credentials by title");
            Ok(deleted)
        })
    }
}
