//! Filesystem-backed artifact store.

use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Artifact store rooted at a single directory.
///
/// Writes go through a temp file followed by a rename, so a concurrent read
/// never observes a partially written artifact. Names carry a sortable UTC
/// timestamp plus a random suffix; collisions within a retention window
/// would need two artifacts in the same second with the same 8 hex digits
/// of a v4 UUID.
pub struct LocalArtifactStore {
    root: PathBuf,
    retention: Duration,
}

impl LocalArtifactStore {
    pub async fn new(root: impl Into<PathBuf>, retention: Duration) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        tracing::info!("artifact store at {}", root.display());
        Ok(Self { root, retention })
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Generate a fresh artifact name: `20260830_141503_9f2c41aa.pdf`.
    pub fn generate_name(extension: &str) -> String {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let suffix = &Uuid::new_v4().simple().to_string()[..8];
        format!("{}_{}.{}", timestamp, suffix, extension)
    }

    /// Persist content under a freshly generated name and return that name.
    pub async fn store(&self, bytes: &[u8], extension: &str) -> Result<String, StoreError> {
        let name = Self::generate_name(extension);
        let tmp = self.root.join(format!(".{}.tmp", name));

        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, self.root.join(&name)).await?;

        tracing::info!("stored artifact {} ({} bytes)", name, bytes.len());
        Ok(name)
    }

    /// Read an artifact back; `None` when missing, expired-and-swept, or the
    /// name is not one we could have generated.
    pub async fn retrieve(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if !is_safe_name(name) {
            return Ok(None);
        }
        match fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an artifact now. Returns whether anything was actually removed;
    /// a missing artifact is not an error, so repeated deletes are no-ops.
    pub async fn delete(&self, name: &str) -> Result<bool, StoreError> {
        if !is_safe_name(name) {
            return Ok(false);
        }
        match fs::remove_file(self.root.join(name)).await {
            Ok(()) => {
                tracing::info!("deleted artifact {}", name);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete every artifact older than the retention window. Returns the
    /// number removed. Orphaned temp files are swept on the same schedule.
    pub async fn sweep_expired(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }

            let expired = metadata
                .modified()
                .ok()
                .and_then(|mtime| mtime.elapsed().ok())
                .is_some_and(|age| age >= self.retention);
            if !expired {
                continue;
            }

            match fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                // Lost a race with a scheduled delete; that's the point.
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        if removed > 0 {
            tracing::info!("sweep removed {} expired artifacts", removed);
        }
        Ok(removed)
    }
}

/// Periodic background sweep; safety net for scheduled deletions lost to a
/// process restart.
pub fn spawn_sweeper(store: Arc<LocalArtifactStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = store.sweep_expired().await {
                tracing::warn!("expiry sweep failed: {}", e);
            }
        }
    })
}

/// Content type for a stored artifact, derived from its extension.
pub fn content_type_for(name: &str) -> &'static str {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Artifact names never contain path separators or lead with a dot, so a
/// crafted download name cannot escape the store directory.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn test_store(retention: Duration) -> (tempfile::TempDir, LocalArtifactStore) {
        let dir = tempdir().unwrap();
        let store = LocalArtifactStore::new(dir.path(), retention).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn store_then_retrieve_roundtrips() {
        let (_dir, store) = test_store(Duration::from_secs(60)).await;

        let name = store.store(b"%PDF-1.5 fake", "pdf").await.unwrap();
        let bytes = store.retrieve(&name).await.unwrap().unwrap();
        assert_eq!(bytes, b"%PDF-1.5 fake");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, store) = test_store(Duration::from_secs(60)).await;

        let name = store.store(b"data", "pdf").await.unwrap();
        assert!(store.delete(&name).await.unwrap());
        assert!(!store.delete(&name).await.unwrap());
        assert!(!store.delete("never-existed.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn retrieve_missing_is_none() {
        let (_dir, store) = test_store(Duration::from_secs(60)).await;
        assert!(store.retrieve("absent.pdf").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let (_dir, store) = test_store(Duration::from_secs(60)).await;
        assert!(store.retrieve("../secrets.txt").await.unwrap().is_none());
        assert!(store.retrieve("a/b.pdf").await.unwrap().is_none());
        assert!(!store.delete("..").await.unwrap());
    }

    #[tokio::test]
    async fn sweep_removes_expired_artifacts() {
        let (_dir, store) = test_store(Duration::ZERO).await;

        let name = store.store(b"short-lived", "pdf").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let removed = store.sweep_expired().await.unwrap();
        assert!(removed >= 1);
        assert!(store.retrieve(&name).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sweep_spares_fresh_artifacts() {
        let (_dir, store) = test_store(Duration::from_secs(3600)).await;

        let name = store.store(b"fresh", "pdf").await.unwrap();
        assert_eq!(store.sweep_expired().await.unwrap(), 0);
        assert!(store.retrieve(&name).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn concurrent_stores_get_distinct_names() {
        let (_dir, store) = test_store(Duration::from_secs(60)).await;
        let store = Arc::new(store);

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.store(&[i as u8], "pdf").await.unwrap() })
            })
            .collect();

        let mut names = Vec::new();
        for handle in handles {
            names.push(handle.await.unwrap());
        }

        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn generated_names_have_timestamp_and_suffix() {
        let name = LocalArtifactStore::generate_name("zip");
        assert!(name.ends_with(".zip"));
        // 15 chars of timestamp, underscore, 8 hex chars.
        let stem = name.strip_suffix(".zip").unwrap();
        assert_eq!(stem.len(), 15 + 1 + 8);
        assert!(is_safe_name(&name));
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type_for("a.pdf"), "application/pdf");
        assert_eq!(content_type_for("a.zip"), "application/zip");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
    }
}
