pub mod cache;
pub mod fetcher;

pub use cache::{AssetCache, AssetResponse, AssetSource, CacheStore, DEFAULT_NAMESPACE};
pub use fetcher::{AssetFetcher, HttpFetcher};
