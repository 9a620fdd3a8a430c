#![forbid(unsafe_code)]

use crate::error::Error;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::trace;

#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Fetch the raw bytes of an asset.
    async fn load(&self, path: &Path) -> Result<Vec<u8>, Error>;
}

/// Reads assets from the local filesystem, relative to `root`.
#[derive(Debug, Clone, Default)]
pub struct FsAssetLoader {
    root: Option<PathBuf>,
}

impl FsAssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            // asset paths are site-absolute ("/car.glb"), keep them under root
            Some(root) => root.join(path.strip_prefix("/").unwrap_or(path)),
            None => path.to_owned(),
        }
    }
}

#[async_trait]
impl AssetLoader for FsAssetLoader {
    async fn load(&self, path: &Path) -> Result<Vec<u8>, Error> {
        let full = self.resolve(path);
        let bytes = tokio::task::spawn_blocking(move || std::fs::read(&full)).await??;
        trace!(path = %path.display(), len = bytes.len(), "asset read");
        Ok(bytes)
    }
}
