//! # loaddev-db
//!
//! libSQL persistence for LoadDev: rifles, loads, shot groups, shots, and
//! reloading components.
//!
//! Every query is scoped by owner id. Rows belonging to another owner are
//! indistinguishable from rows that do not exist.
//!
//! Uses the `libsql` crate (v0.9.29), which provides native FTS5 for
//! component search and optional remote databases over Hrana.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod statistics;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;
use loaddev_config::DatabaseConfig;

/// Central database handle.
///
/// Wraps a libSQL database and a single shared connection.
pub struct LoadDevDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl LoadDevDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        tracing::info!(path, "opened local database");
        Self::init(db).await
    }

    /// Open a remote libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established or
    /// migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        tracing::info!(url, "opened remote database");
        Self::init(db).await
    }

    /// Open whichever database the configuration describes.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if opening or migrating fails.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.is_remote() {
            Self::open_remote(&config.url, &config.auth_token).await
        } else {
            Self::open_local(&config.path).await
        }
    }

    async fn init(db: libsql::Database) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let loaddev_db = Self { db, conn };
        loaddev_db.run_migrations().await?;
        Ok(loaddev_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Run a query and map every row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or any row mapping fails.
    pub async fn query_all<T>(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
        map: impl Fn(&libsql::Row) -> Result<T, DatabaseError>,
    ) -> Result<Vec<T>, DatabaseError> {
        let mut rows = self.conn.query(sql, params).await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(map(&row)?);
        }
        Ok(out)
    }

    /// Run a query and map the first row, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query or the row mapping fails.
    pub async fn query_opt<T>(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
        map: impl Fn(&libsql::Row) -> Result<T, DatabaseError>,
    ) -> Result<Option<T>, DatabaseError> {
        let mut rows = self.conn.query(sql, params).await?;
        rows.next().await?.map(|row| map(&row)).transpose()
    }

    /// Run an `INSERT ... RETURNING id` and return the new id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no id comes back.
    pub async fn insert_returning_id(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self.conn.query(sql, params).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }
}
