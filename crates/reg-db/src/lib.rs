//! # reg-db
//!
//! libSQL persistence for student registrations.
//!
//! Holds the `students` table, generates record IDs, and runs the embedded
//! migration on open. Uses the `libsql` crate in local mode; pass `":memory:"`
//! for a throwaway database.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
mod test_support;

use std::path::Path;

use error::DatabaseError;
use libsql::Builder;

/// Database handle for registration state.
pub struct RegDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl RegDb {
    /// Open a local database at the given path.
    ///
    /// Creates the parent directory of a file-backed database if needed and
    /// runs migrations automatically.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created, the
    /// database cannot be opened, or migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        let reg_db = Self { db, conn };
        reg_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(reg_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"stu-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query("SELECT ?1 || '-' || lower(hex(randomblob(4)))", [prefix])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
