use serde::{Deserialize, Serialize};

/// The central entity: one shortened link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub code: String,
    pub original_url: String,
    pub owner_id: String,
    pub is_deleted: bool,
}

/// One line of the append-only file log.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StoredLink {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: String,

    #[serde(default)]
    pub is_deleted: bool,
}

impl From<LinkRecord> for StoredLink {
    fn from(record: LinkRecord) -> Self {
        StoredLink {
            short_code: record.code,
            original_url: record.original_url,
            owner_id: record.owner_id,
            is_deleted: record.is_deleted,
        }
    }
}

impl From<StoredLink> for LinkRecord {
    fn from(stored: StoredLink) -> Self {
        LinkRecord {
            code: stored.short_code,
            original_url: stored.original_url,
            owner_id: stored.owner_id,
            is_deleted: stored.is_deleted,
        }
    }
}

/// One unit of a batch insert. The caller derives `code` from
/// `original_url` before the batch reaches storage; `correlation_id` is
/// echoed back in the batch response and never persisted.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub correlation_id: String,
    pub code: String,
    pub original_url: String,
}
