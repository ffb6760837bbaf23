use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{ArchiveSink, ArchiveSource};
use crate::error::{MhtError, Result};

/// Archive file on the local filesystem
pub struct LocalFileSource {
    path: PathBuf,
    size: u64,
}

impl LocalFileSource {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let size = std::fs::metadata(&path)
            .map_err(|e| MhtError::file(&path, e))?
            .len();
        Ok(Self { path, size })
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

#[async_trait]
impl ArchiveSource for LocalFileSource {
    async fn read_all(&self) -> Result<Vec<u8>> {
        fs::read(&self.path)
            .await
            .map_err(|e| MhtError::file(&self.path, e))
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Archive file to create on the local filesystem
pub struct LocalFileSink {
    path: PathBuf,
}

impl LocalFileSink {
    /// Refuses an existing file unless `overwrite` is set. Nothing is
    /// written until [`ArchiveSink::write_all`].
    pub fn new(path: impl AsRef<Path>, overwrite: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.exists() && !overwrite {
            return Err(MhtError::ArchiveExists(path));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ArchiveSink for LocalFileSink {
    async fn write_all(&self, data: &[u8]) -> Result<()> {
        fs::write(&self.path, data)
            .await
            .map_err(|e| MhtError::file(&self.path, e))
    }
}
