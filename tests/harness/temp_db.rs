use std::path::{Path, PathBuf};
use std::sync::Arc;

use ordergate::adapter::outbound::sqlite::database::connection::{open, DbPool};
use ordergate::adapter::outbound::sqlite::settings::StorageConfig;
use ordergate::adapter::outbound::sqlite::store::SqliteOrderStore;
use ordergate::infrastructure::bootstrap::Services;
use ordergate::infrastructure::config::settings::Config;
use ordergate::port::outbound::store::OrderStore;
use tempfile::TempDir;

/// Migrated SQLite database in a private temp directory.
pub struct TempDb {
    pool: DbPool,
    path: PathBuf,
    _dir: TempDir,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("ordergate-{name}-"))
            .tempdir()
            .expect("create temp dir");
        let path = dir.path().join("orders.db");
        let pool = open(&path.to_string_lossy(), &StorageConfig::default()).expect("open sqlite");
        Self {
            pool,
            path,
            _dir: dir,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn store(&self) -> Arc<dyn OrderStore> {
        Arc::new(SqliteOrderStore::new(self.pool.clone()))
    }

    /// Default config pointed at this database, with no publish retry delay.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.database = self.path.to_string_lossy().into_owned();
        config.publisher.retry_delay_ms = 0;
        config
    }

    /// Full service graph over this database.
    pub fn services(&self) -> Services {
        Services::with_store(self.config(), self.store()).expect("build services")
    }
}
