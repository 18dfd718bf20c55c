use crate::{
    types::{Album, ApiError, ListAlbumsResponse},
    utils,
};

use super::{LibraryClient, decode_page};

/// Outcome of listing all albums owned by the user.
#[derive(Debug, Clone)]
pub struct AlbumAggregate {
    pub albums: Vec<Album>,
    pub error: Option<ApiError>,
}

impl LibraryClient {
    /// Lists every album owned by the signed-in user.
    ///
    /// Loading the full list may take multiple requests; the loop runs
    /// until no continuation token is returned. Albums have no mime type,
    /// so only gaps in the returned array are dropped.
    pub async fn list_albums(&self, token: &str, page_size: i32) -> AlbumAggregate {
        let mut albums: Vec<Album> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut api_url = self.endpoint(&format!("/v1/albums?pageSize={}", page_size));
            if let Some(token_val) = &page_token {
                api_url.push_str(&format!("&pageToken={}", token_val));
            }

            let outcome = self.http.get(&api_url).bearer_auth(token).send().await;

            let page: ListAlbumsResponse = match decode_page(outcome).await {
                Ok(page) => page,
                Err(error) => {
                    return AlbumAggregate {
                        albums,
                        error: Some(error),
                    };
                }
            };

            albums.extend(utils::compact_albums(page.albums.unwrap_or_default()));

            page_token = page.next_page_token;

            if page_token.is_none() {
                break;
            }
        }

        AlbumAggregate {
            albums,
            error: None,
        }
    }
}
