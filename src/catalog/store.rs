use std::{
    collections::HashMap,
    future::Future,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, warn};

use crate::{catalog::CatalogSource, error::Result, types::Attraction};

type CachedCatalog = Arc<Vec<Attraction>>;

/// Cache of loaded destination catalogs. Each key is populated at most
/// once, even under concurrent lookups; later readers share the populated
/// entry without locking.
#[derive(Debug, Default)]
pub struct CatalogCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<CachedCatalog>>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached catalog for `key`, running `populate` only if no
    /// other caller has populated (or is currently populating) the entry.
    pub async fn get_or_populate<F, Fut>(&self, key: &str, populate: F) -> CachedCatalog
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<Attraction>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        cell.get_or_init(|| async { Arc::new(populate().await) })
            .await
            .clone()
    }
}

/// Catalog accessor backed by one JSON file per destination under a data
/// root, e.g. `data/attractions/beijing.json`.
#[derive(Debug)]
pub struct FileCatalogStore {
    root: PathBuf,
    cache: CatalogCache,
}

impl FileCatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: CatalogCache::new(),
        }
    }

    /// List the destination keys that have a data file, sorted
    pub fn available_destinations(&self) -> Vec<String> {
        let mut destinations: Vec<String> = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| {
                    let path = entry.path();
                    if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                        path.file_stem()
                            .and_then(|stem| stem.to_str())
                            .map(|stem| stem.to_string())
                    } else {
                        None
                    }
                })
                .collect(),
            Err(err) => {
                warn!(root = %self.root.display(), error = %err, "failed to list catalog data root");
                Vec::new()
            }
        };
        destinations.sort();
        destinations
    }

    /// Look an attraction up by id across every known destination
    pub async fn find_attraction(&self, id: &str) -> Option<Attraction> {
        for destination in self.available_destinations() {
            let attractions = self.cached(&destination).await;
            if let Some(found) = attractions.iter().find(|a| a.id == id) {
                return Some(found.clone());
            }
        }
        None
    }

    async fn cached(&self, destination: &str) -> CachedCatalog {
        let path = self.root.join(format!("{destination}.json"));
        self.cache
            .get_or_populate(destination, || read_catalog_file(path))
            .await
    }
}

#[async_trait]
impl CatalogSource for FileCatalogStore {
    async fn load(&self, destination: &str) -> Result<Vec<Attraction>> {
        if destination.contains(&['/', '\\'][..]) || destination.contains("..") {
            warn!(destination, "rejecting destination key that is not a plain name");
            return Ok(Vec::new());
        }
        let attractions = self.cached(destination).await;
        Ok(attractions.as_ref().clone())
    }
}

/// Read and parse one destination file. Unreadable or unparseable files
/// degrade to an empty catalog so the pipeline reports the destination as
/// unknown rather than failing internally.
async fn read_catalog_file(path: PathBuf) -> Vec<Attraction> {
    let data = match tokio::fs::read_to_string(&path).await {
        Ok(data) => data,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read catalog file");
            return Vec::new();
        }
    };

    parse_catalog(&data, &path)
}

fn parse_catalog(data: &str, path: &Path) -> Vec<Attraction> {
    let mut deserializer = serde_json::Deserializer::from_str(data);
    match serde_path_to_error::deserialize::<_, Vec<Attraction>>(&mut deserializer) {
        Ok(attractions) => {
            debug!(path = %path.display(), count = attractions.len(), "loaded catalog file");
            attractions
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                location = %err.path(),
                error = %err,
                "failed to parse catalog file"
            );
            Vec::new()
        }
    }
}
