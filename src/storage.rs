use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;

/// Persistence seam for avatar images. Production uses the disk store; unit
/// tests substitute a no-op fake.
#[async_trait]
pub trait AvatarStore: Send + Sync {
    async fn save(&self, filename: &str, body: Bytes) -> anyhow::Result<()>;
    async fn delete(&self, filename: &str) -> anyhow::Result<()>;
    fn public_url(&self, filename: &str) -> String;
}

/// Writes avatars as plain files under `<static_dir>/avatars`, served back
/// through the `/static` route.
#[derive(Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    pub fn new(static_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: static_dir.as_ref().join("avatars"),
        }
    }
}

#[async_trait]
impl AvatarStore for DiskStore {
    async fn save(&self, filename: &str, body: Bytes) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .context("create avatars dir")?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    async fn delete(&self, filename: &str) -> anyhow::Result<()> {
        let path = self.dir.join(filename);
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("remove {}", path.display()))?;
        Ok(())
    }

    fn public_url(&self, filename: &str) -> String {
        format!("/static/avatars/{}", filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn save_then_delete_roundtrip() {
        let root = std::env::temp_dir().join(format!("unihelp-store-{}", Uuid::new_v4().simple()));
        let store = DiskStore::new(&root);

        store
            .save("u1.png", Bytes::from_static(b"png-bytes"))
            .await
            .expect("save should succeed");
        let on_disk = root.join("avatars").join("u1.png");
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"png-bytes");

        store.delete("u1.png").await.expect("delete should succeed");
        assert!(!on_disk.exists());

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn delete_of_missing_file_errors() {
        let store = DiskStore::new(std::env::temp_dir());
        assert!(store.delete("does-not-exist.png").await.is_err());
    }

    #[test]
    fn public_url_is_under_static() {
        let store = DiskStore::new("static");
        assert_eq!(store.public_url("a_b.png"), "/static/avatars/a_b.png");
    }
}
