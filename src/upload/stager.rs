//! File staging on top of `object_store`

use crate::config::StorageSettings;
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;

/// Moves uploaded files from the temp area into permanent storage
#[async_trait]
pub trait FileStager: Send + Sync {
    /// Write an uploaded file into the temp area, returning its name
    async fn stage(&self, file_name: &str, data: Bytes) -> Result<String>;

    /// Move `temp/<name>` to `posts/<name>`, returning the stored path
    async fn promote(&self, file_name: &str) -> Result<String>;
}

/// Stager over any object store (local directory, in-memory, ...)
#[derive(Debug, Clone)]
pub struct ObjectStoreStager {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Prefix of freshly uploaded files
    temp_dir: String,
    /// Prefix of files attached to posts
    posts_dir: String,
}

impl ObjectStoreStager {
    /// Create a stager over an existing store
    pub fn new(
        store: Arc<dyn ObjectStore>,
        temp_dir: impl Into<String>,
        posts_dir: impl Into<String>,
    ) -> Self {
        Self {
            store,
            temp_dir: temp_dir.into().trim_matches('/').to_string(),
            posts_dir: posts_dir.into().trim_matches('/').to_string(),
        }
    }

    /// Create a stager rooted at a local directory
    pub fn local(
        root: impl AsRef<Path>,
        temp_dir: impl Into<String>,
        posts_dir: impl Into<String>,
    ) -> Result<Self> {
        let root = root.as_ref();

        // Create directory if it doesn't exist
        std::fs::create_dir_all(root)?;

        let store = LocalFileSystem::new_with_prefix(root)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self::new(Arc::new(store), temp_dir, posts_dir))
    }

    /// Create a stager that keeps files in memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "temp", "posts")
    }

    /// Create a local stager from storage settings
    pub fn from_settings(settings: &StorageSettings) -> Result<Self> {
        Self::local(&settings.root, &settings.temp_dir, &settings.posts_dir)
    }

    /// Check whether a file has been moved into the posts area
    pub async fn is_promoted(&self, file_name: &str) -> Result<bool> {
        let path = self.posts_path(&base_name(file_name)?);
        match self.store.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(Error::storage(format!("Failed to inspect {path}: {e}"))),
        }
    }

    fn temp_path(&self, name: &str) -> ObjectPath {
        ObjectPath::from(format!("{}/{name}", self.temp_dir))
    }

    fn posts_path(&self, name: &str) -> ObjectPath {
        ObjectPath::from(format!("{}/{name}", self.posts_dir))
    }
}

#[async_trait]
impl FileStager for ObjectStoreStager {
    async fn stage(&self, file_name: &str, data: Bytes) -> Result<String> {
        let name = base_name(file_name)?;
        let path = self.temp_path(&name);

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::storage(format!("Failed to write {path}: {e}")))?;

        tracing::debug!("Staged upload at {}", path);
        Ok(name)
    }

    async fn promote(&self, file_name: &str) -> Result<String> {
        let name = base_name(file_name)?;
        let from = self.temp_path(&name);
        let to = self.posts_path(&name);

        match self.store.head(&from).await {
            Ok(_) => {}
            Err(object_store::Error::NotFound { .. }) => {
                return Err(Error::FileNotFound {
                    path: from.to_string(),
                })
            }
            Err(e) => return Err(Error::storage(format!("Failed to inspect {from}: {e}"))),
        }

        self.store
            .rename(&from, &to)
            .await
            .map_err(|e| Error::storage(format!("Failed to move {from} to {to}: {e}")))?;

        tracing::info!("Moved {} to {}", from, to);
        Ok(to.to_string())
    }
}

/// Last path segment of an uploaded name
fn base_name(file_name: &str) -> Result<String> {
    Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != "..")
        .map(String::from)
        .ok_or_else(|| Error::bad_request(format!("Invalid file name: {file_name:?}")))
}
