//! disk-backed implementation of the engine's file storage contract.
//!
//! uploads are stored under `<root>/images/<entity>/` or
//! `<root>/files/<entity>/` with generated uuid filenames, so collisions
//! cannot occur by construction.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs;
use tracing::warn;
use uuid::Uuid;

use opsdesk_engine::FileStore;
use opsdesk_types::FileKind;

/// file storage rooted at the configured upload directory.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: Arc<PathBuf>,
}

impl DiskStore {
    /// create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    fn subdir(kind: FileKind) -> &'static str {
        match kind {
            FileKind::Image => "images",
            FileKind::Document => "files",
        }
    }

    /// persist one uploaded file, returning its stored path.
    pub async fn save(
        &self,
        entity: &str,
        kind: FileKind,
        original_name: &str,
        bytes: &[u8],
    ) -> std::io::Result<String> {
        let ext = std::path::Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let dir = self.root.join(Self::subdir(kind)).join(entity);
        fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("{}.{ext}", Uuid::new_v4()));
        fs::write(&path, bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    /// true when a stored path still exists on disk.
    pub async fn exists(&self, path: &str) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }
}

impl FileStore for DiskStore {
    async fn remove(&self, path: &str) {
        match fs::remove_file(path).await {
            Ok(()) => {}
            // tolerate files that are already gone
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path, "failed to remove stored file: {e}"),
        }
    }
}
