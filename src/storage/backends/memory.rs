use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::{Result, ShortenerError};
use crate::storage::models::{BatchItem, LinkRecord};
use crate::storage::Storage;

/// In-process backend: a single code-keyed map behind a `RwLock`.
/// Writers hold the write lock across the whole read-modify-write
/// section so two callers racing to insert the same new URL cannot both
/// succeed. Nothing survives a process restart.
pub struct MemoryStorage {
    records: RwLock<HashMap<String, LinkRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Conflict detection scans stored values for `original_url`
    /// equality rather than probing the code key. Two different URLs
    /// that truncate to the same code are therefore not distinguished;
    /// the second insert overwrites nothing but its conflict also goes
    /// undetected by code.
    fn url_exists(records: &HashMap<String, LinkRecord>, url: &str) -> bool {
        records.values().any(|r| r.original_url == url)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, code: &str) -> Result<Option<LinkRecord>> {
        let records = self.records.read().unwrap();
        Ok(records.get(code).cloned())
    }

    async fn put(&self, code: &str, url: &str, owner_id: &str) -> Result<()> {
        let mut records = self.records.write().unwrap();

        if Self::url_exists(&records, url) {
            return Err(ShortenerError::conflict(format!(
                "URL already stored: {}",
                url
            )));
        }

        records.insert(
            code.to_string(),
            LinkRecord {
                code: code.to_string(),
                original_url: url.to_string(),
                owner_id: owner_id.to_string(),
                is_deleted: false,
            },
        );

        Ok(())
    }

    async fn put_batch(&self, items: &[BatchItem], owner_id: &str) -> Result<()> {
        // One write lock for the whole batch keeps it atomic for readers.
        let mut records = self.records.write().unwrap();

        for item in items {
            if Self::url_exists(&records, &item.original_url) {
                debug!("Skipping already stored URL in batch: {}", item.original_url);
                continue;
            }

            records.insert(
                item.code.clone(),
                LinkRecord {
                    code: item.code.clone(),
                    original_url: item.original_url.clone(),
                    owner_id: owner_id.to_string(),
                    is_deleted: false,
                },
            );
        }

        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<LinkRecord>> {
        let records = self.records.read().unwrap();
        Ok(records
            .values()
            .filter(|r| r.owner_id == owner_id && !r.is_deleted)
            .cloned()
            .collect())
    }

    async fn soft_delete(&self, codes: &[String], owner_id: &str) -> Result<()> {
        let mut records = self.records.write().unwrap();

        for code in codes {
            match records.get_mut(code) {
                Some(record) if record.owner_id == owner_id => {
                    record.is_deleted = true;
                }
                Some(_) => {
                    debug!("Skipping delete of {}: owner mismatch", code);
                }
                None => {}
            }
        }

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
