use std::sync::Arc;

use shortener::short;
use shortener::storage::backends::file::FileStorage;
use shortener::storage::backends::memory::MemoryStorage;
use shortener::storage::{BatchItem, Storage};
use tempfile::TempDir;

fn batch_item(correlation_id: &str, url: &str) -> BatchItem {
    BatchItem {
        correlation_id: correlation_id.to_string(),
        code: short::code(url.as_bytes()),
        original_url: url.to_string(),
    }
}

mod memory_storage_tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let storage = MemoryStorage::new();

        storage
            .put("abc12345", "https://example.com/a", "user1")
            .await
            .unwrap();

        let record = storage.get("abc12345").await.unwrap().unwrap();
        assert_eq!(record.code, "abc12345");
        assert_eq!(record.original_url, "https://example.com/a");
        assert_eq!(record.owner_id, "user1");
        assert!(!record.is_deleted);
    }

    #[tokio::test]
    async fn test_get_unknown_code_is_none() {
        let storage = MemoryStorage::new();
        assert!(storage.get("missing1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_url_is_conflict() {
        let storage = MemoryStorage::new();

        storage
            .put("abc12345", "https://example.com/a", "user1")
            .await
            .unwrap();

        let err = storage
            .put("abc12345", "https://example.com/a", "user2")
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        // Exactly one record exists afterwards.
        let links = storage.list_by_owner("user1").await.unwrap();
        assert_eq!(links.len(), 1);
        assert!(storage.list_by_owner("user2").await.unwrap().is_empty());
    }

    // Conflict detection keys off original_url equality, the canonical
    // rule: a different URL arriving under the same (colliding) code is
    // not reported as a conflict.
    #[tokio::test]
    async fn test_conflict_is_keyed_by_url_not_code() {
        let storage = MemoryStorage::new();

        storage
            .put("same0000", "https://example.com/a", "user1")
            .await
            .unwrap();

        let result = storage
            .put("same0000", "https://example.com/b", "user1")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_soft_delete_requires_matching_owner() {
        let storage = MemoryStorage::new();

        storage
            .put("abc12345", "https://example.com/a", "user1")
            .await
            .unwrap();

        // Wrong owner: silently skipped.
        storage
            .soft_delete(&["abc12345".to_string()], "user2")
            .await
            .unwrap();
        let record = storage.get("abc12345").await.unwrap().unwrap();
        assert!(!record.is_deleted);

        // Right owner: tombstoned but still retrievable.
        storage
            .soft_delete(&["abc12345".to_string()], "user1")
            .await
            .unwrap();
        let record = storage.get("abc12345").await.unwrap().unwrap();
        assert!(record.is_deleted);
    }

    #[tokio::test]
    async fn test_soft_delete_ignores_unknown_codes() {
        let storage = MemoryStorage::new();
        storage
            .soft_delete(&["missing1".to_string()], "user1")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_excludes_deleted_records() {
        let storage = MemoryStorage::new();

        storage
            .put("code0001", "https://example.com/1", "user1")
            .await
            .unwrap();
        storage
            .put("code0002", "https://example.com/2", "user1")
            .await
            .unwrap();
        storage
            .soft_delete(&["code0001".to_string()], "user1")
            .await
            .unwrap();

        let links = storage.list_by_owner("user1").await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].code, "code0002");
    }

    #[tokio::test]
    async fn test_list_for_unknown_owner_is_empty_not_error() {
        let storage = MemoryStorage::new();
        let links = storage.list_by_owner("nobody").await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_batch_inserts_all_items() {
        let storage = MemoryStorage::new();

        let batch = vec![
            batch_item("corr-1", "https://example.com/1"),
            batch_item("corr-2", "https://example.com/2"),
        ];
        storage.put_batch(&batch, "user1").await.unwrap();

        let links = storage.list_by_owner("user1").await.unwrap();
        assert_eq!(links.len(), 2);
    }

    #[tokio::test]
    async fn test_batch_skips_already_stored_urls() {
        let storage = MemoryStorage::new();

        storage
            .put(
                &short::code(b"https://example.com/1"),
                "https://example.com/1",
                "user1",
            )
            .await
            .unwrap();

        let batch = vec![
            batch_item("corr-1", "https://example.com/1"),
            batch_item("corr-2", "https://example.com/2"),
        ];
        storage.put_batch(&batch, "user2").await.unwrap();

        // The duplicate stays with its original owner.
        assert_eq!(storage.list_by_owner("user1").await.unwrap().len(), 1);
        assert_eq!(storage.list_by_owner("user2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ping() {
        let storage = MemoryStorage::new();
        assert!(storage.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_puts_of_same_url_yield_one_record() {
        let storage = Arc::new(MemoryStorage::new());

        let mut handles = Vec::new();
        for i in 0..8 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage
                    .put("abc12345", "https://example.com/a", &format!("user{}", i))
                    .await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
    }
}

mod file_storage_tests {
    use super::*;

    #[tokio::test]
    async fn test_creates_file_and_parent_dirs_on_first_use() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/links.jsonl");

        let storage = FileStorage::new(path.to_str().unwrap()).unwrap();
        assert!(path.exists());
        assert!(storage.get("missing1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.jsonl");
        let storage = FileStorage::new(path.to_str().unwrap()).unwrap();

        storage
            .put("abc12345", "https://example.com/a", "user1")
            .await
            .unwrap();

        let record = storage.get("abc12345").await.unwrap().unwrap();
        assert_eq!(record.original_url, "https://example.com/a");
        assert_eq!(record.owner_id, "user1");
        assert!(!record.is_deleted);
    }

    #[tokio::test]
    async fn test_duplicate_url_is_conflict() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.jsonl");
        let storage = FileStorage::new(path.to_str().unwrap()).unwrap();

        storage
            .put("abc12345", "https://example.com/a", "user1")
            .await
            .unwrap();

        let err = storage
            .put("abc12345", "https://example.com/a", "user1")
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        assert_eq!(storage.list_by_owner("user1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_records_survive_reopening() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.jsonl");

        {
            let storage = FileStorage::new(path.to_str().unwrap()).unwrap();
            storage
                .put("abc12345", "https://example.com/a", "user1")
                .await
                .unwrap();
        }

        let reopened = FileStorage::new(path.to_str().unwrap()).unwrap();
        let record = reopened.get("abc12345").await.unwrap().unwrap();
        assert_eq!(record.original_url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_soft_delete_rewrites_tombstone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.jsonl");
        let storage = FileStorage::new(path.to_str().unwrap()).unwrap();

        storage
            .put("abc12345", "https://example.com/a", "user1")
            .await
            .unwrap();

        // Wrong owner first: record untouched.
        storage
            .soft_delete(&["abc12345".to_string()], "user2")
            .await
            .unwrap();
        assert!(!storage.get("abc12345").await.unwrap().unwrap().is_deleted);

        storage
            .soft_delete(&["abc12345".to_string()], "user1")
            .await
            .unwrap();
        assert!(storage.get("abc12345").await.unwrap().unwrap().is_deleted);

        // The tombstone is persisted, not just cached.
        let reopened = FileStorage::new(path.to_str().unwrap()).unwrap();
        assert!(reopened.get("abc12345").await.unwrap().unwrap().is_deleted);
        assert!(reopened.list_by_owner("user1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_batch_appends_all_items_at_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.jsonl");
        let storage = FileStorage::new(path.to_str().unwrap()).unwrap();

        let batch = vec![
            batch_item("corr-1", "https://example.com/1"),
            batch_item("corr-2", "https://example.com/2"),
            // In-batch duplicate, silently skipped.
            batch_item("corr-3", "https://example.com/1"),
        ];
        storage.put_batch(&batch, "user1").await.unwrap();

        assert_eq!(storage.list_by_owner("user1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_file_holds_one_json_record_per_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.jsonl");
        let storage = FileStorage::new(path.to_str().unwrap()).unwrap();

        storage
            .put("abc12345", "https://example.com/a", "user1")
            .await
            .unwrap();
        storage
            .put("def67890", "https://example.com/b", "user1")
            .await
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["short_code"], "abc12345");
        assert_eq!(first["original_url"], "https://example.com/a");
        assert_eq!(first["owner_id"], "user1");
        assert_eq!(first["is_deleted"], false);
    }

    #[tokio::test]
    async fn test_ping() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links.jsonl");
        let storage = FileStorage::new(path.to_str().unwrap()).unwrap();

        assert!(storage.ping().await.is_ok());
    }
}
