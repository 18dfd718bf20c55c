//! # API Module
//!
//! HTTP handlers for the photo frame application, built on the
//! [Axum](https://docs.rs/axum) web framework.
//!
//! ## Endpoints
//!
//! ### Pages
//!
//! - [`index`] - login screen, or the photo frame once signed in
//! - [`search_page`] / [`album_page`] - the two selection screens
//!
//! ### Authentication
//!
//! - [`sign_in`] - redirects to the OAuth authorization endpoint
//! - [`callback`] - completes the code exchange and creates the session
//! - [`logout`] - destroys the session and clears the cookie
//!
//! ### Photo endpoints
//!
//! - [`load_from_search`] / [`load_from_album`] - load a fresh queue
//! - [`get_queue`] - the currently loaded queue (cache or replay)
//! - [`get_selected`] - a subset of the queue by media item id
//! - [`get_albums`] - all albums owned by the user
//!
//! ### Monitoring
//!
//! - [`health`] - status and version for monitoring systems
//!
//! All photo endpoints answer with a well-formed JSON payload: either the
//! requested data or the canonical error shape with a status derived from
//! the error's code.

mod auth;
mod health;
mod pages;
mod photos;

pub use auth::PendingLogins;
pub use auth::callback;
pub use auth::logout;
pub use auth::sign_in;
pub use health::health;
pub use pages::album_page;
pub use pages::index;
pub use pages::search_page;
pub use photos::get_albums;
pub use photos::get_queue;
pub use photos::get_selected;
pub use photos::load_from_album;
pub use photos::load_from_search;

use axum::{
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use crate::{
    management::SessionManager,
    types::{ApiError, UserSession},
    warning,
};

pub(crate) const SESSION_COOKIE: &str = "photoframe_session";

/// Pulls the session id out of the request's cookie header.
pub(crate) fn session_id(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Resolves the signed-in user for a request, if any.
pub(crate) async fn current_session(headers: &HeaderMap) -> Option<(String, UserSession)> {
    let session_id = session_id(headers)?;
    let session = SessionManager::new().find(&session_id).await?;
    Some((session_id, session))
}

pub(crate) fn error_response(error: ApiError) -> Response {
    let status = StatusCode::from_u16(error.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(error)).into_response()
}

pub(crate) fn unauthorized() -> Response {
    error_response(ApiError {
        name: Some("Unauthorized".to_string()),
        code: Some(401),
        message: "User not logged in".to_string(),
    })
}

pub(crate) fn respond<T: Serialize>(result: Result<T, ApiError>) -> Response {
    match result {
        Ok(payload) => Json(payload).into_response(),
        Err(error) => {
            warning!("Request failed: {}", error);
            error_response(error)
        }
    }
}
