use axum::{Form, extract::Query, http::HeaderMap, response::Response};
use serde::Deserialize;

use crate::{
    info,
    management::{QueueManager, SessionManager},
    types::{ApiError, SearchForm, SearchParams},
    utils,
};

use super::{current_session, error_response, respond, unauthorized};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumForm {
    pub album_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectedQuery {
    /// Comma-separated media item ids.
    pub ids: Option<String>,
}

/// Handles form submissions from the search page: builds a filter from
/// the form and loads a fresh queue through the Library API.
pub async fn load_from_search(headers: HeaderMap, Form(form): Form<SearchForm>) -> Response {
    let Some((session_id, mut session)) = current_session(&headers).await else {
        return unauthorized();
    };

    info!("Loading images from search for user {}.", session.profile.id);

    let parameters = match utils::build_search_params(&form) {
        Ok(parameters) => parameters,
        Err(message) => {
            return error_response(ApiError {
                name: Some("InvalidRequest".to_string()),
                code: Some(400),
                message,
            });
        }
    };

    let token = SessionManager::new()
        .valid_token(&session_id, &mut session)
        .await;
    respond(
        QueueManager::new()
            .load_queue(&session.profile.id, &token, parameters)
            .await,
    )
}

/// Handles selections from the album page. Loading an album is a search
/// whose only parameter is the album id; no other filters can be combined
/// with it, which is why the aggregation filter re-checks mime types.
pub async fn load_from_album(headers: HeaderMap, Form(form): Form<AlbumForm>) -> Response {
    let Some((session_id, mut session)) = current_session(&headers).await else {
        return unauthorized();
    };

    info!("Importing album: {}", form.album_id);

    let parameters = SearchParams {
        album_id: Some(form.album_id),
        ..Default::default()
    };

    let token = SessionManager::new()
        .valid_token(&session_id, &mut session)
        .await;
    respond(
        QueueManager::new()
            .load_queue(&session.profile.id, &token, parameters)
            .await,
    )
}

/// Returns the media items the user has loaded into the frame, from the
/// hot cache when fresh, otherwise by replaying the stored query.
pub async fn get_queue(headers: HeaderMap) -> Response {
    let Some((session_id, mut session)) = current_session(&headers).await else {
        return unauthorized();
    };

    info!("Loading queue for user {}.", session.profile.id);

    let token = SessionManager::new()
        .valid_token(&session_id, &mut session)
        .await;
    respond(
        QueueManager::new()
            .current_queue(&session.profile.id, &token)
            .await,
    )
}

/// Returns only the requested media items out of the loaded queue.
pub async fn get_selected(headers: HeaderMap, Query(query): Query<SelectedQuery>) -> Response {
    let Some((session_id, mut session)) = current_session(&headers).await else {
        return unauthorized();
    };

    let media_item_ids: Vec<String> = query
        .ids
        .unwrap_or_default()
        .split(',')
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    info!(
        "Loading {} selected items for user {}.",
        media_item_ids.len(),
        session.profile.id
    );

    let token = SessionManager::new()
        .valid_token(&session_id, &mut session)
        .await;
    respond(
        QueueManager::new()
            .selected_items(&session.profile.id, &token, &media_item_ids)
            .await,
    )
}

/// Returns all albums owned by the user.
pub async fn get_albums(headers: HeaderMap) -> Response {
    let Some((session_id, mut session)) = current_session(&headers).await else {
        return unauthorized();
    };

    info!("Loading albums for user {}.", session.profile.id);

    let token = SessionManager::new()
        .valid_token(&session_id, &mut session)
        .await;
    respond(
        QueueManager::new()
            .list_albums(&session.profile.id, &token)
            .await,
    )
}
