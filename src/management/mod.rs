mod cache;
mod queue;
mod session;

pub use cache::ALBUM_CACHE_TTL;
pub use cache::CACHE_NAMESPACES;
pub use cache::CacheEntry;
pub use cache::CacheError;
pub use cache::MEDIA_ITEM_CACHE_TTL;
pub use cache::UserCache;
pub use cache::data_root;
pub use queue::QueueManager;
pub use session::SessionManager;
