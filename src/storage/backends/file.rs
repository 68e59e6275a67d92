use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::{Result, ShortenerError};
use crate::storage::models::{BatchItem, LinkRecord, StoredLink};
use crate::storage::Storage;

/// Append-only log backend: one JSON record per line. Every operation
/// re-scans the file, which is acceptable at the single-node, low-volume
/// scale this backend targets.
///
/// The scan-then-append sequence in `put` is a check-then-act race under
/// concurrency, and `soft_delete` rewrites the whole file, so a single
/// async mutex serializes all operations.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Open the log at `path`, creating the file and any missing parent
    /// directories on first use.
    pub fn new(path: &str) -> Result<Self> {
        let path = PathBuf::from(path);

        if !path.exists() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(&path, "")?;
            info!("Created link log file: {}", path.display());
        }

        Ok(FileStorage {
            path,
            lock: Mutex::new(()),
        })
    }

    fn read_all(&self) -> Result<Vec<StoredLink>> {
        let content = fs::read_to_string(&self.path)?;

        let mut links = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let stored: StoredLink = serde_json::from_str(line).map_err(|e| {
                ShortenerError::serialization(format!(
                    "Corrupt line in {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
            links.push(stored);
        }

        Ok(links)
    }

    fn append_all(&self, links: &[StoredLink]) -> Result<()> {
        let mut buf = String::new();
        for link in links {
            buf.push_str(&serde_json::to_string(link)?);
            buf.push('\n');
        }

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(buf.as_bytes())?;
        Ok(())
    }

    fn rewrite_all(&self, links: &[StoredLink]) -> Result<()> {
        let mut buf = String::new();
        for link in links {
            buf.push_str(&serde_json::to_string(link)?);
            buf.push('\n');
        }

        fs::write(&self.path, buf)?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, code: &str) -> Result<Option<LinkRecord>> {
        let _guard = self.lock.lock().await;

        let links = self.read_all()?;
        Ok(links
            .into_iter()
            .find(|l| l.short_code == code)
            .map(LinkRecord::from))
    }

    async fn put(&self, code: &str, url: &str, owner_id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;

        // Conflict detection keys off original_url equality, the true
        // uniqueness constraint. An earlier variant of this backend keyed
        // the check off short_code; the two coincide for legitimate input
        // because the code is a pure function of the URL, but they are
        // not interchangeable.
        let links = self.read_all()?;
        if links.iter().any(|l| l.original_url == url) {
            return Err(ShortenerError::conflict(format!(
                "URL already stored: {}",
                url
            )));
        }

        self.append_all(&[StoredLink {
            short_code: code.to_string(),
            original_url: url.to_string(),
            owner_id: owner_id.to_string(),
            is_deleted: false,
        }])
    }

    async fn put_batch(&self, items: &[BatchItem], owner_id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;

        let existing = self.read_all()?;

        let mut fresh: Vec<StoredLink> = Vec::new();
        for item in items {
            let duplicate = existing.iter().any(|l| l.original_url == item.original_url)
                || fresh.iter().any(|l| l.original_url == item.original_url);
            if duplicate {
                debug!("Skipping already stored URL in batch: {}", item.original_url);
                continue;
            }

            fresh.push(StoredLink {
                short_code: item.code.clone(),
                original_url: item.original_url.clone(),
                owner_id: owner_id.to_string(),
                is_deleted: false,
            });
        }

        // All new lines go out in one write while the lock is held, so a
        // reader never observes a partially applied batch.
        self.append_all(&fresh)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<LinkRecord>> {
        let _guard = self.lock.lock().await;

        let links = self.read_all()?;
        Ok(links
            .into_iter()
            .filter(|l| l.owner_id == owner_id && !l.is_deleted)
            .map(LinkRecord::from)
            .collect())
    }

    async fn soft_delete(&self, codes: &[String], owner_id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut links = self.read_all()?;
        let mut changed = false;

        for link in links.iter_mut() {
            if codes.iter().any(|c| c == &link.short_code) {
                if link.owner_id == owner_id {
                    if !link.is_deleted {
                        link.is_deleted = true;
                        changed = true;
                    }
                } else {
                    debug!("Skipping delete of {}: owner mismatch", link.short_code);
                }
            }
        }

        if changed {
            self.rewrite_all(&links)?;
        }

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        fs::metadata(&self.path)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
