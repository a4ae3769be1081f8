use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::fetcher::AssetFetcher;

/// Namespace for the current asset generation. Bump the suffix when the
/// precached asset set changes shape.
pub const DEFAULT_NAMESPACE: &str = "music-trainer-v1";

const OFFLINE_FALLBACK: &str = "You are offline and this resource is not cached.";

/// Byte store shared across cache generations, keyed namespace first.
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct CacheStore {
    inner: Arc<Mutex<HashMap<String, HashMap<String, Vec<u8>>>>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, namespace: &str, url: &str, body: Vec<u8>) {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(namespace.to_owned())
            .or_default()
            .insert(url.to_owned(), body);
    }

    fn get(&self, namespace: &str, url: &str) -> Option<Vec<u8>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(namespace)
            .and_then(|assets| assets.get(url).cloned())
    }

    fn retain_namespace(&self, keep: &str) -> Vec<String> {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let stale: Vec<String> = inner
            .keys()
            .filter(|namespace| namespace.as_str() != keep)
            .cloned()
            .collect();
        for namespace in &stale {
            inner.remove(namespace);
        }
        stale
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetSource {
    Cache,
    Network,
    OfflineFallback,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetResponse {
    pub body: Vec<u8>,
    pub source: AssetSource,
}

/// Cache-first asset proxy. Only ever handed same-origin GET URLs, so
/// there is no method or origin filtering here.
pub struct AssetCache {
    namespace: String,
    store: CacheStore,
    fetcher: Arc<dyn AssetFetcher>,
}

impl AssetCache {
    pub fn new(store: CacheStore, fetcher: Arc<dyn AssetFetcher>) -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE, store, fetcher)
    }

    pub fn with_namespace(
        namespace: impl Into<String>,
        store: CacheStore,
        fetcher: Arc<dyn AssetFetcher>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            store,
            fetcher,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_cached(&self, url: &str) -> bool {
        self.store.get(&self.namespace, url).is_some()
    }

    /// Precache the given URLs. A URL that fails to fetch is skipped,
    /// never fatal. Returns how many were stored.
    pub async fn install(&self, urls: &[&str]) -> usize {
        let mut stored = 0;
        for url in urls {
            match self.fetcher.fetch(url).await {
                Ok(body) => {
                    self.store.insert(&self.namespace, url, body);
                    stored += 1;
                }
                Err(error) => {
                    warn!(url, %error, "precache skipped an asset");
                }
            }
        }
        info!(
            namespace = %self.namespace,
            stored,
            requested = urls.len(),
            "precache finished"
        );
        stored
    }

    /// Drop every namespace except the current one. Returns the names
    /// that were removed.
    pub fn activate(&self) -> Vec<String> {
        let stale = self.store.retain_namespace(&self.namespace);
        for namespace in &stale {
            info!(namespace = %namespace, "removed stale asset namespace");
        }
        stale
    }

    /// Cache hit wins; a miss goes to the network and is stored for
    /// next time; a network failure degrades to a plain-text offline
    /// placeholder.
    pub async fn fetch(&self, url: &str) -> AssetResponse {
        if let Some(body) = self.store.get(&self.namespace, url) {
            debug!(url, "asset served from cache");
            return AssetResponse {
                body,
                source: AssetSource::Cache,
            };
        }
        match self.fetcher.fetch(url).await {
            Ok(body) => {
                self.store.insert(&self.namespace, url, body.clone());
                debug!(url, "asset fetched and cached");
                AssetResponse {
                    body,
                    source: AssetSource::Network,
                }
            }
            Err(error) => {
                warn!(url, %error, "asset unavailable, serving offline fallback");
                AssetResponse {
                    body: OFFLINE_FALLBACK.as_bytes().to_vec(),
                    source: AssetSource::OfflineFallback,
                }
            }
        }
    }
}
