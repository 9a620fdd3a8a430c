#![forbid(unsafe_code)]

use crate::asset::AssetLoader;
use crate::error::Error;
use crate::glb::{self, SceneAsset};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{Semaphore, watch};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub enum AssetState {
    NotRequested,
    Loading,
    Ready(Arc<SceneAsset>),
    Failed(Arc<str>),
}

impl AssetState {
    pub fn is_settled(&self) -> bool {
        matches!(self, AssetState::Ready(_) | AssetState::Failed(_))
    }
}

/// Scene assets keyed by path, loaded in the background.
///
/// Each path is loaded at most once; later requests observe the same entry.
#[derive(Clone)]
pub struct AssetCache {
    loader: Arc<dyn AssetLoader>,
    entries: Arc<Mutex<HashMap<PathBuf, watch::Receiver<AssetState>>>>,
    permits: Arc<Semaphore>,
}

impl AssetCache {
    pub fn new(loader: Arc<dyn AssetLoader>, concurrency: usize) -> Self {
        Self {
            loader,
            entries: Arc::default(),
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Start loading `path` unless it is already known. Returns whether a
    /// new load was started.
    pub fn prefetch(&self, path: impl AsRef<Path>) -> Result<bool, Error> {
        let path = path.as_ref();
        let handle = Handle::try_current().map_err(|_| Error::NoRuntime(path.to_owned()))?;

        let tx = {
            let mut entries = self.entries.lock();
            if entries.contains_key(path) {
                return Ok(false);
            }
            let (tx, rx) = watch::channel(AssetState::Loading);
            entries.insert(path.to_owned(), rx);
            tx
        };

        let loader = Arc::clone(&self.loader);
        let permits = Arc::clone(&self.permits);
        let path = path.to_owned();
        debug!(path = %path.display(), "prefetching asset");

        drop(handle.spawn(async move {
            let state = match permits.acquire_owned().await {
                Ok(_permit) => match Self::load(loader.as_ref(), &path).await {
                    Ok(asset) => {
                        info!(
                            path = %path.display(),
                            nodes = asset.node_count(),
                            meshes = asset.mesh_count(),
                            "asset ready"
                        );
                        AssetState::Ready(Arc::new(asset))
                    }
                    Err(err) => {
                        warn!(path = %path.display(), %err, "asset load failed");
                        AssetState::Failed(err.to_string().into())
                    }
                },
                Err(err) => {
                    warn!(%err, "asset semaphore closed");
                    AssetState::Failed(err.to_string().into())
                }
            };
            // nobody listening is fine, the entry keeps its receiver
            let _ = tx.send(state);
        }));

        Ok(true)
    }

    async fn load(loader: &dyn AssetLoader, path: &Path) -> Result<SceneAsset, Error> {
        let bytes = loader.load(path).await?;
        Ok(glb::decode(path, &bytes)?)
    }

    pub fn status(&self, path: impl AsRef<Path>) -> AssetState {
        self.entries
            .lock()
            .get(path.as_ref())
            .map_or(AssetState::NotRequested, |rx| rx.borrow().clone())
    }

    /// The asset, if it finished loading.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Arc<SceneAsset>> {
        match self.status(path) {
            AssetState::Ready(asset) => Some(asset),
            _ => None,
        }
    }

    /// Wait for an in-flight load to settle. Unknown paths return
    /// [`AssetState::NotRequested`] immediately.
    pub async fn wait(&self, path: impl AsRef<Path>) -> AssetState {
        let Some(mut rx) = self.entries.lock().get(path.as_ref()).cloned() else {
            return AssetState::NotRequested;
        };
        match rx.wait_for(AssetState::is_settled).await {
            Ok(state) => state.clone(),
            // sender dropped before settling: the task was aborted
            Err(_) => AssetState::Failed("load task aborted".into()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingLoader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AssetLoader for CountingLoader {
        async fn load(&self, path: &Path) -> Result<Vec<u8>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if path.ends_with("missing.glb") {
                return Err(std::io::Error::from(std::io::ErrorKind::NotFound).into());
            }
            Ok(glb::encode(&json!({"asset": {"version": "2.0"}, "nodes": [{}]}), &[]))
        }
    }

    #[tokio::test]
    async fn loads_once_per_path() {
        let loader = Arc::new(CountingLoader::default());
        let cache = AssetCache::new(loader.clone(), 2);

        assert!(matches!(cache.status("car.glb"), AssetState::NotRequested));
        assert!(cache.prefetch("car.glb").unwrap());
        assert!(!cache.prefetch("car.glb").unwrap());

        let AssetState::Ready(asset) = cache.wait("car.glb").await else {
            panic!("asset should load");
        };
        assert_eq!(asset.node_count(), 1);
        assert!(cache.get("car.glb").is_some());
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_settle_as_failed() {
        let cache = AssetCache::new(Arc::new(CountingLoader::default()), 1);
        cache.prefetch("missing.glb").unwrap();
        assert!(matches!(cache.wait("missing.glb").await, AssetState::Failed(_)));
        assert!(cache.get("missing.glb").is_none());
    }

    #[test]
    fn prefetch_without_runtime_is_an_error() {
        let cache = AssetCache::new(Arc::new(CountingLoader::default()), 1);
        assert!(matches!(cache.prefetch("car.glb"), Err(Error::NoRuntime(_))));
        assert!(cache.is_empty());
    }
}
