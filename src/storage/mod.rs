use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::errors::Result;

pub mod backends;
pub mod models;

pub use models::{BatchItem, LinkRecord};

/// Capability contract every backend implements. Callers only ever see
/// `Arc<dyn Storage>`; which backend is behind it is decided once at
/// startup by [`StorageFactory`].
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Look up a record by short code. `None` means the code was never
    /// stored; a tombstoned record is still returned so the caller can
    /// distinguish "gone" from "never existed".
    async fn get(&self, code: &str) -> Result<Option<LinkRecord>>;

    /// Insert-if-absent keyed by `original_url`. A URL that is already
    /// stored yields `Err(Conflict)`, an expected outcome the caller
    /// resolves by re-deriving the (identical) code.
    async fn put(&self, code: &str, url: &str, owner_id: &str) -> Result<()>;

    /// Insert a batch as a single unit. All-or-nothing: readers never
    /// observe a partially applied batch. URLs already stored are
    /// skipped, never an error.
    async fn put_batch(&self, items: &[BatchItem], owner_id: &str) -> Result<()>;

    /// All non-deleted records for an owner. An owner with none gets an
    /// empty Vec, not an error.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<LinkRecord>>;

    /// Tombstone the given codes where the owner matches. Codes that are
    /// unknown or owned by someone else are silently skipped.
    async fn soft_delete(&self, codes: &[String], owner_id: &str) -> Result<()>;

    /// Liveness probe, bounded by a short internal timeout.
    async fn ping(&self) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

pub struct StorageFactory;

impl StorageFactory {
    /// Select exactly one backend for the lifetime of the process:
    /// relational when a connection string is configured, else the file
    /// log when a path is configured, else the in-memory map.
    pub async fn create(config: &Config) -> Result<Arc<dyn Storage>> {
        if !config.storage.database_url.is_empty() {
            let storage =
                backends::sea_orm::SeaOrmStorage::new(&config.storage.database_url).await?;
            info!("Using relational storage backend");
            return Ok(Arc::new(storage) as Arc<dyn Storage>);
        }

        if !config.storage.file_path.is_empty() {
            let storage = backends::file::FileStorage::new(&config.storage.file_path)?;
            info!("Using file storage backend: {}", config.storage.file_path);
            return Ok(Arc::new(storage) as Arc<dyn Storage>);
        }

        info!("Using in-memory storage backend");
        Ok(Arc::new(backends::memory::MemoryStorage::new()) as Arc<dyn Storage>)
    }
}
