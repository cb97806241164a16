//! SQLite-backed credential storage.

mod credentials;
mod schema;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::private_fs;

pub use schema::SCHEMA_VERSION;

/// File name of the credential database inside the data directory.
pub const DATABASE_FILE: &str = "passwords.db";

/// Shared handle to the credential database.
///
/// Cloning is cheap; every clone talks to the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

/// Platform data directory for pwkeeper (e.g. `~/.local/share/pwkeeper`).
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "bratuha", "pwkeeper")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| Error::Storage("Could not determine data directory".to_string()))
}

impl Database {
    /// Open (or create) the database at `path`, creating parent directories.
    /// The file and any directories created for it are owner-only.
    pub fn open(path: &Path) -> Result<Self> {
        private_fs::create_parent_dir(path)?;
        private_fs::touch(path)?;

        let conn = Connection::open(path)?;
        tracing::debug!("Opened credential database at {}", path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the database in the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(&default_data_dir()?.join(DATABASE_FILE))
    }

    /// Open a private in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the underlying connection.
    pub fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| Error::Storage("Database lock poisoned".to_string()))?;
        f(&conn)
    }

    /// Create the schema, or drop and recreate it on a version mismatch.
    pub fn migrate(&self) -> Result<()> {
        self.with_connection(|conn| {
            let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

            if version != 0 && version != SCHEMA_VERSION {
                tracing::warn!(
                    "Schema version {} does not match {}, recreating tables",
                    version,
                    SCHEMA_VERSION
                );
                conn.execute_batch(schema::DROP_SCHEMA)?;
            }

            conn.execute_batch(schema::SCHEMA)?;
            conn.execute_batch(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))?;

            tracing::debug!("Database migrations completed");
            Ok(())
        })
    }

    /// Schema version recorded in the database file.
    pub fn schema_version(&self) -> Result<i32> {
        self.with_connection(|conn| {
            Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
        })
    }
}
