use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;
use crate::jobs::JobLocks;

#[derive(Clone)]
pub struct AppState {
    /// Multi-tenant destination store.
    pub db: DatabaseConnection,
    /// Read-only legacy catalog.
    pub source: DatabaseConnection,
    pub config: Arc<Config>,
    pub job_locks: JobLocks,
}

impl AppState {
    pub fn new(db: DatabaseConnection, source: DatabaseConnection, config: Config) -> Self {
        Self {
            db,
            source,
            config: Arc::new(config),
            job_locks: JobLocks::new(),
        }
    }
}
