use chrono::Utc;
use reqwest::Client;

use crate::{
    config,
    management::cache::{CacheError, UserCache},
    types::{Token, UserSession},
    utils,
};

/// Browser sessions, stored in the app-storage namespace and keyed by a
/// random session id carried in a cookie.
pub struct SessionManager {
    store: UserCache<UserSession>,
}

impl SessionManager {
    pub fn new() -> Self {
        SessionManager {
            store: UserCache::sessions(),
        }
    }

    pub async fn create(&self, session: UserSession) -> Result<String, CacheError> {
        let session_id = utils::generate_session_id();
        self.store.set(&session_id, session).await?;
        Ok(session_id)
    }

    pub async fn find(&self, session_id: &str) -> Option<UserSession> {
        self.store.get(session_id).await
    }

    pub async fn destroy(&self, session_id: &str) -> Result<(), CacheError> {
        self.store.delete(session_id).await
    }

    /// Returns an access token that is good for at least a few more
    /// minutes, refreshing and re-persisting the session when the stored
    /// one has expired. Without a refresh token the stale access token is
    /// returned as-is and the remote will reject it.
    pub async fn valid_token(&self, session_id: &str, session: &mut UserSession) -> String {
        if is_expired(&session.token) {
            if let Some(refresh_token) = session.token.refresh_token.clone() {
                if let Ok(new_token) = refresh_access_token(&refresh_token).await {
                    session.token = new_token;
                    let _ = self.store.set(session_id, session.clone()).await;
                }
            }
        }

        session.token.access_token.clone()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

fn is_expired(token: &Token) -> bool {
    let now = Utc::now().timestamp() as u64;
    now >= (token.obtained_at + token.expires_in).saturating_sub(240)
}

async fn refresh_access_token(refresh_token: &str) -> Result<Token, String> {
    let client = Client::new();
    let res = client
        .post(&config::oauth_token_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &config::oauth_client_id()),
            ("client_secret", &config::oauth_client_secret()),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let json: serde_json::Value = res.json().await.map_err(|e| e.to_string())?;

    Ok(Token {
        access_token: json["access_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        // The token endpoint only rotates the refresh token sometimes;
        // keep the old one when none comes back.
        refresh_token: json["refresh_token"]
            .as_str()
            .map(str::to_string)
            .or_else(|| Some(refresh_token.to_string())),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
        obtained_at: Utc::now().timestamp() as u64,
    })
}
