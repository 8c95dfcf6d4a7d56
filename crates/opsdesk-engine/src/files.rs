//! uploaded-file bookkeeping and the file storage seam.
//!
//! the engine never touches the filesystem itself; it records which uploads
//! belong to the current request and asks the injected [`FileStore`] to drop
//! them when a write fails, so no orphaned uploads survive a rejected
//! operation.

use std::future::Future;

/// storage collaborator contract.
///
/// implementations store files keyed by a generated unique path and must
/// tolerate removal of paths that no longer exist.
pub trait FileStore: Send + Sync {
    /// remove a stored file; a missing file is not an error.
    fn remove(&self, path: &str) -> impl Future<Output = ()> + Send;
}

/// the uploads received with one request: field name → stored path.
#[derive(Debug, Clone, Default)]
pub struct UploadedFiles {
    entries: Vec<(String, String)>,
}

impl UploadedFiles {
    /// record a stored upload for `field`.
    pub fn push(&mut self, field: impl Into<String>, path: impl Into<String>) {
        self.entries.push((field.into(), path.into()));
    }

    /// stored path of the upload matching `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, path)| path.as_str())
    }

    /// true when no uploads were received.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// iterate over `(field, path)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, p)| (f.as_str(), p.as_str()))
    }
}

/// delete every upload of this request from storage.
///
/// called on each failure path that can follow an upload; best-effort, the
/// store tolerates already-missing files.
pub async fn discard_uploads(store: &impl FileStore, uploads: &UploadedFiles) {
    for (_, path) in uploads.iter() {
        store.remove(path).await;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// records removals instead of touching a filesystem.
    #[derive(Default)]
    pub struct RecordingStore {
        pub removed: Mutex<Vec<String>>,
    }

    impl FileStore for RecordingStore {
        async fn remove(&self, path: &str) {
            self.removed.lock().unwrap().push(path.to_string());
        }
    }
}
