//! Configuration management for the photo frame server.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and a `.env` file. Credentials have no defaults
//! and must be provided; endpoint URLs and aggregation tuning fall back to
//! the values recommended for the public Google Photos Library API.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `photoframe/.env` in the platform-specific
/// local data directory. A missing `.env` file is not an error; in that
/// case all configuration must come from the process environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/photoframe/.env`
/// - macOS: `~/Library/Application Support/photoframe/.env`
/// - Windows: `%LOCALAPPDATA%/photoframe/.env`
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// exists but cannot be parsed.
pub async fn load_env() -> crate::Res<()> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("photoframe/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(path)?;
    }
    Ok(())
}

/// Returns the address and port the HTTP server binds to.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the OAuth client ID from the Google Developers console.
///
/// # Panics
///
/// Panics if the `OAUTH_CLIENT_ID` environment variable is not set.
pub fn oauth_client_id() -> String {
    env::var("OAUTH_CLIENT_ID").expect("OAUTH_CLIENT_ID must be set")
}

/// Returns the OAuth client secret from the Google Developers console.
///
/// # Panics
///
/// Panics if the `OAUTH_CLIENT_SECRET` environment variable is not set.
pub fn oauth_client_secret() -> String {
    env::var("OAUTH_CLIENT_SECRET").expect("OAUTH_CLIENT_SECRET must be set")
}

/// Returns the redirect URI registered for the OAuth client.
///
/// # Panics
///
/// Panics if the `OAUTH_REDIRECT_URI` environment variable is not set.
pub fn oauth_redirect_uri() -> String {
    env::var("OAUTH_REDIRECT_URI").expect("OAUTH_REDIRECT_URI must be set")
}

/// Returns the OAuth authorization endpoint.
pub fn oauth_auth_url() -> String {
    env::var("OAUTH_AUTH_URL")
        .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/v2/auth".to_string())
}

/// Returns the OAuth token exchange endpoint.
pub fn oauth_token_url() -> String {
    env::var("OAUTH_TOKEN_URL").unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string())
}

/// Returns the endpoint used to resolve the signed-in user's profile.
pub fn oauth_userinfo_url() -> String {
    env::var("OAUTH_USERINFO_URL")
        .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v3/userinfo".to_string())
}

/// Returns the scopes requested during sign-in.
///
/// The app needs read access to the photo library plus the basic profile
/// used to partition the caches by user.
pub fn oauth_scope() -> String {
    env::var("OAUTH_SCOPE").unwrap_or_else(|_| {
        "https://www.googleapis.com/auth/photoslibrary.readonly profile".to_string()
    })
}

/// Returns the base URL of the Photos Library API.
pub fn photos_api_url() -> String {
    env::var("PHOTOS_API_URL").unwrap_or_else(|_| "https://photoslibrary.googleapis.com".to_string())
}

/// Returns the minimum number of photos to aggregate for a search request.
///
/// The aggregation loop keeps requesting pages until at least this many
/// items have been collected or the remote runs out of pages, so responses
/// may contain more items than this value.
pub fn photos_to_load() -> usize {
    env::var("PHOTOS_TO_LOAD")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(150)
}

/// Returns the page size for search requests. 100 is recommended.
pub fn search_page_size() -> i32 {
    env::var("SEARCH_PAGE_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(100)
}

/// Returns the page size for the album listing request. 50 is recommended.
pub fn album_page_size() -> i32 {
    env::var("ALBUM_PAGE_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(50)
}
