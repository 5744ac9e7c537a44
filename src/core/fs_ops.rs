// src/core/fs_ops.rs
//! File system helpers shared by the cache and the exporters.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() || path.exists() {
            return Ok(());
        }
        fs::create_dir_all(path)
            .await
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        info!("Created directory: {}", path.display());
        Ok(())
    }

    /// Write `content`, creating parent directories first.
    pub async fn write_file_safe(path: &Path, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        info!("Written file: {}", path.display());
        Ok(())
    }

    /// Resolve `relative` against `base` unless it is already absolute.
    pub fn normalize_path(base: &Path, relative: &Path) -> PathBuf {
        if relative.is_absolute() {
            relative.to_path_buf()
        } else {
            base.join(relative)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join("applicants.csv");
        FsOps::write_file_safe(&path, b"id,name\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id,name\n");
    }

    #[test]
    fn test_normalize_path() {
        let base = Path::new("/srv/app");
        assert_eq!(
            FsOps::normalize_path(base, Path::new("cache.db")),
            PathBuf::from("/srv/app/cache.db")
        );
        assert_eq!(
            FsOps::normalize_path(base, Path::new("/tmp/cache.db")),
            PathBuf::from("/tmp/cache.db")
        );
    }
}
