//! Service layer over the registration database.
//!
//! `RegService` wraps `RegDb` (raw database access). Repository methods are
//! implemented as `impl RegService` blocks under `repos/`.

use crate::RegDb;
use crate::error::DatabaseError;

/// Entry point for registration persistence, shared across request handlers.
pub struct RegService {
    db: RegDb,
}

impl RegService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrated.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = RegDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &RegDb {
        &self.db
    }
}
