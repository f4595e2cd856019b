use crate::observations::error::DataLoadError;
use crate::observations::loader::{ObservationLoader, StationSource};
use log::{debug, info};
use polars::frame::DataFrame;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;
use tokio::fs;
use tokio::sync::Mutex;

/// Identity of a loaded source: canonical path, modification time and the
/// declared variables it was validated against.
///
/// An edited file gets a new key and is read again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
    pub variables: Vec<String>,
}

impl SourceKey {
    /// Same file and variables, regardless of modification time.
    pub fn same_source(&self, other: &SourceKey) -> bool {
        self.path == other.path && self.variables == other.variables
    }
}

/// Session-owned memo of loaded station frames.
pub struct FrameCache {
    loader: ObservationLoader,
    frames: Mutex<HashMap<SourceKey, DataFrame>>,
}

impl FrameCache {
    pub fn new(loader: ObservationLoader) -> Self {
        Self {
            loader,
            frames: Mutex::new(HashMap::new()),
        }
    }

    async fn source_key(source: &StationSource) -> Result<SourceKey, DataLoadError> {
        let path = fs::canonicalize(&source.path)
            .await
            .map_err(|e| DataLoadError::FileMetadata(source.path.clone(), e))?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| DataLoadError::FileMetadata(path.clone(), e))?;
        let mut variables: Vec<String> = source
            .variables
            .iter()
            .map(|v| v.column_name().to_string())
            .collect();
        variables.sort();
        Ok(SourceKey {
            path,
            modified: metadata.modified().ok(),
            variables,
        })
    }

    /// Returns the prepared frame for `source`, reading the file only on a cache miss.
    ///
    /// A frame loaded from an older version of the same file is replaced.
    pub async fn get_or_load(&self, source: &StationSource) -> Result<DataFrame, DataLoadError> {
        let key = Self::source_key(source).await?;

        {
            let cache = self.frames.lock().await;
            if let Some(frame) = cache.get(&key) {
                info!(
                    "Cache hit for dataset '{}' at {:?}",
                    source.name, key.path
                );
                return Ok(frame.clone());
            }
        }

        info!(
            "Cache miss for dataset '{}' at {:?}, reading file",
            source.name, key.path
        );
        // Read outside the lock
        let loaded = self.loader.load(source).await?;

        let mut cache = self.frames.lock().await;
        if let Some(frame) = cache.get(&key) {
            debug!("Dataset '{}' was cached concurrently", source.name);
            return Ok(frame.clone());
        }
        let before = cache.len();
        cache.retain(|cached, _| !key.same_source(cached));
        if cache.len() < before {
            info!(
                "Evicted stale entry for dataset '{}' at {:?}",
                source.name, key.path
            );
        }
        cache.insert(key, loaded.clone());
        Ok(loaded)
    }

    pub async fn len(&self) -> usize {
        self.frames.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.frames.lock().await.is_empty()
    }

    pub async fn clear(&self) {
        self.frames.lock().await.clear();
    }
}
