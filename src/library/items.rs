use crate::{
    types::{BatchGetMediaItemsResponse, MediaItem, SearchParams},
    utils,
};

use super::{LibraryClient, MediaItemAggregate, decode_page};

impl LibraryClient {
    /// Fetches specific media items by id from the Library API.
    ///
    /// Results come back wrapped per requested id; wrappers for ids that
    /// could not be resolved are dropped along with the rest of the
    /// invalid entries by the shared item filter. There is no item
    /// threshold for this mode: the loop is purely token-driven and runs
    /// until the continuation token is exhausted.
    pub async fn batch_get_media_items(
        &self,
        token: &str,
        media_item_ids: &[String],
    ) -> MediaItemAggregate {
        let mut parameters = SearchParams {
            media_item_ids: Some(media_item_ids.to_vec()),
            ..Default::default()
        };
        let mut media_items: Vec<MediaItem> = Vec::new();

        loop {
            let outcome = self
                .http
                .post(self.endpoint("/v1/mediaItems:batchGet"))
                .bearer_auth(token)
                .json(&parameters)
                .send()
                .await;

            let page: BatchGetMediaItemsResponse = match decode_page(outcome).await {
                Ok(page) => page,
                Err(error) => {
                    return MediaItemAggregate {
                        media_items,
                        parameters,
                        error: Some(error),
                    };
                }
            };

            let raw: Vec<Option<MediaItem>> = page
                .media_item_results
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .map(|result| result.media_item)
                .collect();
            media_items.extend(utils::filter_image_items(raw));

            parameters.page_token = page.next_page_token;

            if parameters.page_token.is_none() {
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
