use crate::{
    types::{ApiError, MediaItem, SearchMediaItemsResponse, SearchParams},
    utils,
};

use super::{LibraryClient, decode_page};

/// Outcome of an aggregation run over media items.
///
/// `media_items` accumulates survivors of the per-page filter in server
/// order; duplicates are not removed. `parameters` is the request shape
/// as it looked when the loop stopped, continuation token included. When
/// `error` is set the items reflect only what was gathered before the
/// failure and must not be cached.
#[derive(Debug, Clone)]
pub struct MediaItemAggregate {
    pub media_items: Vec<MediaItem>,
    pub parameters: SearchParams,
    pub error: Option<ApiError>,
}

impl LibraryClient {
    /// Submits a search request to the Library API and aggregates results
    /// across pages.
    ///
    /// The loop keeps requesting pages while fewer than `threshold` valid
    /// items have been collected and the response still carries a
    /// continuation token, so the result may contain more items than
    /// requested. Each page is filtered through
    /// [`utils::filter_image_items`] before counting towards the
    /// threshold.
    ///
    /// The same entry point serves both criteria searches (`filters`) and
    /// album loads (`album_id`); the Library API accepts either shape on
    /// its search endpoint.
    ///
    /// A failing page stops the loop immediately and surfaces the
    /// normalized error; no retries are performed.
    pub async fn search_media_items(
        &self,
        token: &str,
        mut parameters: SearchParams,
        threshold: usize,
        page_size: i32,
    ) -> MediaItemAggregate {
        let mut media_items: Vec<MediaItem> = Vec::new();
        parameters.page_size = Some(page_size);

        // Loop until the required number of photos has been loaded or
        // until there are no more pages, ie. there is no pageToken.
        loop {
            let outcome = self
                .http
                .post(self.endpoint("/v1/mediaItems:search"))
                .bearer_auth(token)
                .json(&parameters)
                .send()
                .await;

            let page: SearchMediaItemsResponse = match decode_page(outcome).await {
                Ok(page) => page,
                Err(error) => {
                    return MediaItemAggregate {
                        media_items,
                        parameters,
                        error: Some(error),
                    };
                }
            };

            media_items.extend(utils::filter_image_items(page.media_items.unwrap_or_default()));

            // Set the pageToken for the next request.
            parameters.page_token = page.next_page_token;

            if media_items.len() >= threshold || parameters.page_token.is_none() {
                break;
            }
        }

        MediaItemAggregate {
            media_items,
            parameters,
            error: None,
        }
    }
}
