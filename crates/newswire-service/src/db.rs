use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to {database_url}: {source}")]
    Connection {
        database_url: String,
        source: diesel::ConnectionError,
    },
    #[error("Failed to run migrations: {0}")]
    Migration(String),
}

/// Opens the single connection shared by the whole process and brings its
/// schema up to date.
pub fn establish_connection(database_url: &str) -> Result<SqliteConnection, DbError> {
    let mut connection =
        SqliteConnection::establish(database_url).map_err(|source| DbError::Connection {
            database_url: database_url.to_string(),
            source,
        })?;

    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| DbError::Migration(err.to_string()))?;
    tracing::info!(count = applied.len(), "Applied pending migrations");

    Ok(connection)
}
