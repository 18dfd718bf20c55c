use std::{io, marker::PhantomData, path::PathBuf, time::Duration};

use chrono::Utc;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::types::{Album, MediaItem, SearchParams, UserSession};

/// How long aggregated media items stay servable. The remote API expires
/// access to media URLs after 60 minutes; 55 keeps a safety margin.
pub const MEDIA_ITEM_CACHE_TTL: Duration = Duration::from_secs(55 * 60);

/// How long a loaded album listing stays servable.
pub const ALBUM_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

pub const MEDIA_ITEM_NAMESPACE: &str = "media-item-cache";
pub const ALBUM_NAMESPACE: &str = "album-cache";
pub const QUERY_NAMESPACE: &str = "query-storage";
pub const APP_NAMESPACE: &str = "app-storage";

/// Every namespace entries are stored under, for the operator tooling.
pub const CACHE_NAMESPACES: [&str; 4] = [
    MEDIA_ITEM_NAMESPACE,
    ALBUM_NAMESPACE,
    QUERY_NAMESPACE,
    APP_NAMESPACE,
];

#[derive(Debug)]
pub enum CacheError {
    IoError(io::Error),
    SerdeError(serde_json::Error),
}

impl From<io::Error> for CacheError {
    fn from(err: io::Error) -> Self {
        CacheError::IoError(err)
    }
}

/// One stored value together with the metadata needed to expire it.
/// `ttl_ms` is stamped from the cache configuration at write time;
/// entries without it never expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at: i64,
    pub ttl_ms: Option<u64>,
}

/// Returns the directory all cache namespaces live under.
pub fn data_root() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("photoframe");
    path
}

/// A key-value store partitioned by user key, one JSON file per entry.
///
/// Expiry is per entry and time based; there is no size bound and no
/// eviction order. A `get` past the entry's TTL treats it as absent and
/// removes the file. Writes overwrite whole entries, so concurrent
/// actions for the same user resolve to last-writer-wins.
pub struct UserCache<T> {
    root: PathBuf,
    namespace: &'static str,
    ttl: Option<Duration>,
    _marker: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> UserCache<T> {
    pub fn open(namespace: &'static str, ttl: Option<Duration>) -> Self {
        Self::at_root(data_root(), namespace, ttl)
    }

    /// Opens a cache rooted somewhere other than the data directory.
    pub fn at_root(root: impl Into<PathBuf>, namespace: &'static str, ttl: Option<Duration>) -> Self {
        UserCache {
            root: root.into(),
            namespace,
            ttl,
            _marker: PhantomData,
        }
    }

    pub async fn get(&self, user_key: &str) -> Option<T> {
        let path = self.entry_path(user_key);
        let content = async_fs::read_to_string(&path).await.ok()?;
        let entry: CacheEntry<T> = serde_json::from_str(&content).ok()?;

        if let Some(ttl_ms) = entry.ttl_ms {
            let age = Utc::now().timestamp_millis().saturating_sub(entry.stored_at);
            if age > ttl_ms as i64 {
                let _ = async_fs::remove_file(&path).await;
                return None;
            }
        }

        Some(entry.value)
    }

    pub async fn set(&self, user_key: &str, value: T) -> Result<(), CacheError> {
        let path = self.entry_path(user_key);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(CacheError::IoError)?;
        }

        let entry = CacheEntry {
            value,
            stored_at: Utc::now().timestamp_millis(),
            ttl_ms: self.ttl.map(|ttl| ttl.as_millis() as u64),
        };
        let json = serde_json::to_string_pretty(&entry).map_err(CacheError::SerdeError)?;
        async_fs::write(&path, json)
            .await
            .map_err(CacheError::IoError)
    }

    pub async fn delete(&self, user_key: &str) -> Result<(), CacheError> {
        let path = self.entry_path(user_key);
        match async_fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CacheError::IoError(err)),
        }
    }

    fn entry_path(&self, user_key: &str) -> PathBuf {
        self.root
            .join(self.namespace)
            .join(format!("{user_key}.json"))
    }
}

impl UserCache<Vec<MediaItem>> {
    /// The hot tier: media items selected for the frame, including their
    /// short-lived base URLs.
    pub fn media_items() -> Self {
        Self::open(MEDIA_ITEM_NAMESPACE, Some(MEDIA_ITEM_CACHE_TTL))
    }
}

impl UserCache<Vec<Album>> {
    /// Album listings, cached so the album picker stays responsive.
    pub fn albums() -> Self {
        Self::open(ALBUM_NAMESPACE, Some(ALBUM_CACHE_TTL))
    }
}

impl UserCache<SearchParams> {
    /// The durable tier: the last query each user loaded, kept without
    /// expiry so it can be resubmitted when the hot tier has lapsed.
    pub fn queries() -> Self {
        Self::open(QUERY_NAMESPACE, None)
    }
}

impl UserCache<UserSession> {
    /// Miscellaneous per-user application state; holds browser sessions.
    pub fn sessions() -> Self {
        Self::open(APP_NAMESPACE, None)
    }
}
