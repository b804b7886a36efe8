//! Database connection management using Diesel ORM.
//!
//! Provides connection pooling, migration support, and per-connection
//! pragmas for SQLite databases.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::adapter::outbound::sqlite::settings::StorageConfig;
use crate::error::{Error, Result};

/// Embedded database migrations compiled from the migrations/ directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for a SQLite connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Applies foreign keys and busy timeout to every new connection.
#[derive(Debug, Clone, Copy)]
pub struct SqlitePragmas {
    busy_timeout_ms: u64,
}

impl SqlitePragmas {
    #[must_use]
    pub const fn new(busy_timeout_ms: u64) -> Self {
        Self { busy_timeout_ms }
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Strip an optional `sqlite://` scheme.
fn normalize_url(database_url: &str) -> &str {
    database_url
        .strip_prefix("sqlite://")
        .unwrap_or(database_url)
}

/// Create a connection pool for the given database URL.
///
/// `:memory:` databases are private to a connection, so the pool is capped
/// at one connection for them.
///
/// # Errors
/// Returns an error if the pool cannot be created.
pub fn create_pool(database_url: &str, config: &StorageConfig) -> Result<DbPool> {
    let url = normalize_url(database_url);
    let max_size = if url == ":memory:" {
        1
    } else {
        config.pool_size.max(1)
    };

    let manager = ConnectionManager::<SqliteConnection>::new(url);
    Pool::builder()
        .max_size(max_size)
        .connection_timeout(Duration::from_millis(config.connection_timeout_ms))
        .connection_customizer(Box::new(SqlitePragmas::new(config.busy_timeout_ms)))
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Run all pending database migrations.
///
/// # Errors
/// Returns an error if migrations fail.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

/// Open a pool and bring the schema up to date.
///
/// # Errors
/// Returns an error if the pool cannot be created or migrations fail.
pub fn open(database_url: &str, config: &StorageConfig) -> Result<DbPool> {
    let pool = create_pool(database_url, config)?;
    run_migrations(&pool)?;
    Ok(pool)
}
