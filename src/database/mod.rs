pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod schema;

use std::sync::Arc;

use tracing::info;

use crate::config::{self, StorageBackend};

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemorySecretRepository;
pub use postgres::PgSecretRepository;
pub use repository::{SecretPage, SecretRepository};

/// Build the configured storage backend. Postgres connects and ensures the
/// schema; memory starts empty.
pub async fn repository_from_config() -> Result<Arc<dyn SecretRepository>, DatabaseError> {
    match config::config().database.storage {
        StorageBackend::Postgres => {
            let pool = DatabaseManager::pool().await?;
            schema::ensure_schema(&pool).await?;
            Ok(Arc::new(PgSecretRepository::new(pool)))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data will not survive restarts");
            Ok(Arc::new(MemorySecretRepository::new()))
        }
    }
}
