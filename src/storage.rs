use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::debug;

/// Where uploaded car images end up. The returned name is what gets
/// persisted on the car record, never the client-supplied filename.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn store(&self, original_name: &str, body: Bytes) -> anyhow::Result<String>;
}

/// Local-disk storage under a single upload directory.
#[derive(Clone)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self { root })
    }
}

#[async_trait]
impl StorageClient for DiskStorage {
    async fn store(&self, original_name: &str, body: Bytes) -> anyhow::Result<String> {
        let name = stored_name(original_name, OffsetDateTime::now_utc().unix_timestamp_nanos());
        let path = self.root.join(&name);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;
        debug!(name = %name, bytes = body.len(), "stored upload");
        Ok(name)
    }
}

/// Upload timestamp plus the original extension; the original base name is
/// dropped entirely.
fn stored_name(original_name: &str, timestamp_nanos: i128) -> String {
    match Path::new(original_name).extension() {
        Some(ext) => format!("{}.{}", timestamp_nanos, ext.to_string_lossy()),
        None => timestamp_nanos.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn stored_name_keeps_extension_only() {
        let name = stored_name("My Holiday Photo.jpg", 1_700_000_000_000_000_000);
        assert_eq!(name, "1700000000000000000.jpg");
    }

    #[test]
    fn stored_name_without_extension() {
        assert_eq!(stored_name("raw", 42), "42");
    }

    #[tokio::test]
    async fn disk_storage_writes_under_root() {
        let root = std::env::temp_dir().join(format!("carhub-test-{}", Uuid::new_v4()));
        let storage = DiskStorage::new(&root).expect("create storage");

        let name = storage
            .store("front.png", Bytes::from_static(b"pngdata"))
            .await
            .expect("store file");

        assert!(name.ends_with(".png"));
        assert_ne!(name, "front.png");
        let written = tokio::fs::read(root.join(&name)).await.expect("read back");
        assert_eq!(written, b"pngdata");

        tokio::fs::remove_dir_all(&root).await.ok();
    }

    #[tokio::test]
    async fn two_uploads_get_distinct_names() {
        let root = std::env::temp_dir().join(format!("carhub-test-{}", Uuid::new_v4()));
        let storage = DiskStorage::new(&root).expect("create storage");

        let a = storage.store("a.jpg", Bytes::from_static(b"a")).await.unwrap();
        let b = storage.store("b.jpg", Bytes::from_static(b"b")).await.unwrap();
        assert_ne!(a, b);

        tokio::fs::remove_dir_all(&root).await.ok();
    }
}
