use crate::{
    config,
    library::LibraryClient,
    management::cache::{CacheError, UserCache},
    types::{Album, AlbumsResponse, ApiError, MediaItem, QueueResponse, SearchParams},
};

/// Decides, per request, whether a user is served from cache or the
/// stored query is replayed against the Library API.
///
/// The manager owns every lifecycle transition of the cache tiers; the
/// aggregation loops in [`crate::library`] only ever return results. A
/// failed aggregation never populates a tier.
pub struct QueueManager {
    client: LibraryClient,
    media_items: UserCache<Vec<MediaItem>>,
    albums: UserCache<Vec<Album>>,
    queries: UserCache<SearchParams>,
}

impl QueueManager {
    pub fn new() -> Self {
        Self::with_parts(
            LibraryClient::new(),
            UserCache::media_items(),
            UserCache::albums(),
            UserCache::queries(),
        )
    }

    pub fn with_parts(
        client: LibraryClient,
        media_items: UserCache<Vec<MediaItem>>,
        albums: UserCache<Vec<Album>>,
        queries: UserCache<SearchParams>,
    ) -> Self {
        QueueManager {
            client,
            media_items,
            albums,
            queries,
        }
    }

    /// Loads a fresh queue from a user-supplied query (a new search or an
    /// album selection). On success both tiers are overwritten: the items
    /// land in the hot cache and the query, stripped of its pagination
    /// state, is stored for later replay. On error nothing is cached.
    pub async fn load_queue(
        &self,
        user_id: &str,
        token: &str,
        parameters: SearchParams,
    ) -> Result<QueueResponse, ApiError> {
        let aggregate = self
            .client
            .search_media_items(
                token,
                parameters,
                config::photos_to_load(),
                config::search_page_size(),
            )
            .await;

        if let Some(error) = aggregate.error {
            return Err(error);
        }

        // Remove the pageToken and pageSize from the parameters. They are
        // set again when the query is resubmitted and must not leak into
        // a replay.
        let parameters = strip_transient(aggregate.parameters);

        self.media_items
            .set(user_id, aggregate.media_items.clone())
            .await
            .map_err(cache_failure)?;
        self.queries
            .set(user_id, parameters.clone())
            .await
            .map_err(cache_failure)?;

        Ok(QueueResponse {
            media_items: Some(aggregate.media_items),
            parameters: Some(parameters),
        })
    }

    /// Returns whatever queue is currently loaded for the user.
    ///
    /// A hot-cache hit is served directly. On a miss the stored query is
    /// resubmitted; this is intentional, because rerunning the search
    /// picks up any new photos matching the criteria instead of pinning a
    /// stale snapshot. A successful replay refills the hot tier only; the
    /// stored query is already known good and stays untouched, as do both
    /// tiers when the replay fails. With nothing stored at all the empty
    /// response is a success: the user just has not loaded anything yet.
    pub async fn current_queue(
        &self,
        user_id: &str,
        token: &str,
    ) -> Result<QueueResponse, ApiError> {
        if let Some(media_items) = self.media_items.get(user_id).await {
            let parameters = self.queries.get(user_id).await;
            return Ok(QueueResponse {
                media_items: Some(media_items),
                parameters,
            });
        }

        let Some(stored) = self.queries.get(user_id).await else {
            return Ok(QueueResponse::default());
        };

        let aggregate = self
            .client
            .search_media_items(
                token,
                stored,
                config::photos_to_load(),
                config::search_page_size(),
            )
            .await;

        if let Some(error) = aggregate.error {
            return Err(error);
        }

        let parameters = strip_transient(aggregate.parameters);
        self.media_items
            .set(user_id, aggregate.media_items.clone())
            .await
            .map_err(cache_failure)?;

        Ok(QueueResponse {
            media_items: Some(aggregate.media_items),
            parameters: Some(parameters),
        })
    }

    /// Returns only the requested items out of the loaded queue.
    ///
    /// When the hot cache holds the queue the subset is filtered out of
    /// it in cache order without touching the network. Otherwise the ids
    /// are fetched directly; that fallback deliberately writes to neither
    /// tier, so a partial id-driven fetch can not displace a full queue.
    pub async fn selected_items(
        &self,
        user_id: &str,
        token: &str,
        media_item_ids: &[String],
    ) -> Result<QueueResponse, ApiError> {
        if let Some(cached) = self.media_items.get(user_id).await {
            let filtered: Vec<MediaItem> = cached
                .into_iter()
                .filter(|item| media_item_ids.contains(&item.id))
                .collect();
            return Ok(QueueResponse {
                media_items: Some(filtered),
                parameters: Some(SearchParams {
                    media_item_ids: Some(media_item_ids.to_vec()),
                    ..Default::default()
                }),
            });
        }

        let aggregate = self.client.batch_get_media_items(token, media_item_ids).await;

        if let Some(error) = aggregate.error {
            return Err(error);
        }

        Ok(QueueResponse {
            media_items: Some(aggregate.media_items),
            parameters: Some(strip_transient(aggregate.parameters)),
        })
    }

    /// Returns all albums owned by the user, from cache when possible.
    /// Listing albums takes multiple requests, so a short-lived cache
    /// keeps the picker responsive when the user navigates back to it.
    /// On a failed listing the cached entry is cleared.
    pub async fn list_albums(&self, user_id: &str, token: &str) -> Result<AlbumsResponse, ApiError> {
        if let Some(albums) = self.albums.get(user_id).await {
            return Ok(AlbumsResponse { albums });
        }

        let aggregate = self
            .client
            .list_albums(token, config::album_page_size())
            .await;

        if let Some(error) = aggregate.error {
            let _ = self.albums.delete(user_id).await;
            return Err(error);
        }

        self.albums
            .set(user_id, aggregate.albums.clone())
            .await
            .map_err(cache_failure)?;

        Ok(AlbumsResponse {
            albums: aggregate.albums,
        })
    }
}

impl Default for QueueManager {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_transient(mut parameters: SearchParams) -> SearchParams {
    parameters.page_token = None;
    parameters.page_size = None;
    parameters
}

fn cache_failure(err: CacheError) -> ApiError {
    ApiError::internal(format!("failed to persist cache entry: {:?}", err))
}
