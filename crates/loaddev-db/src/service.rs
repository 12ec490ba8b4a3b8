//! Service layer over the database.
//!
//! `LoadDevService` wraps `LoadDevDb`. All repository methods are implemented
//! as `impl LoadDevService` blocks in `repos/`, and every one of them takes
//! the caller's owner id.

use loaddev_config::DatabaseConfig;

use crate::LoadDevDb;
use crate::error::DatabaseError;

pub struct LoadDevService {
    db: LoadDevDb,
}

impl LoadDevService {
    /// Create a service over a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = LoadDevDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create a service from configuration (local file or remote libSQL).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let db = LoadDevDb::from_config(config).await?;
        Ok(Self { db })
    }

    /// Create from an existing `LoadDevDb`.
    #[must_use]
    pub const fn from_db(db: LoadDevDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &LoadDevDb {
        &self.db
    }
}
