use anyhow::{bail, Context};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::contract::model::ImageRef;
use crate::domain::ports::MediaStore;

/// Disk-backed media store. Storage ids are generated server-side and are
/// plain `<uuid>.<ext>` file names, so they never traverse out of the root.
pub struct LocalMediaStore {
    root: PathBuf,
    public_base: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    /// Absolute path for a stored asset; rejects ids that are not plain file
    /// names (callers pass ids straight from URLs).
    pub fn path_for(&self, storage_id: &str) -> anyhow::Result<PathBuf> {
        if storage_id.is_empty()
            || storage_id
                .chars()
                .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '.'))
        {
            bail!("invalid storage id");
        }
        Ok(self.root.join(storage_id))
    }
}

fn extension_of(filename: &str) -> Option<&str> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> anyhow::Result<ImageRef> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("cannot create media root {}", self.root.display()))?;

        let storage_id = match extension_of(filename) {
            Some(ext) => format!("{}.{}", Uuid::new_v4().simple(), ext.to_ascii_lowercase()),
            None => Uuid::new_v4().simple().to_string(),
        };
        let path = self.root.join(&storage_id);

        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("cannot write media file {}", path.display()))?;

        Ok(ImageRef {
            url: format!("{}/{}", self.public_base.trim_end_matches('/'), storage_id),
            storage_id,
        })
    }

    async fn release(&self, storage_id: &str) -> anyhow::Result<()> {
        let path = self.path_for(storage_id)?;
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("cannot remove media file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_release_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "/media");

        let image = store.upload("cover.JPG", vec![1, 2, 3]).await.unwrap();
        assert!(image.storage_id.ends_with(".jpg"));
        assert!(image.url.starts_with("/media/"));
        assert!(dir.path().join(&image.storage_id).exists());

        store.release(&image.storage_id).await.unwrap();
        assert!(!dir.path().join(&image.storage_id).exists());
    }

    #[test]
    fn path_for_rejects_traversal() {
        let store = LocalMediaStore::new("/tmp/media", "/media");
        assert!(store.path_for("../etc/passwd").is_err());
        assert!(store.path_for("a/b").is_err());
        assert!(store.path_for("").is_err());
        assert!(store.path_for("abc123.png").is_ok());
    }
}
