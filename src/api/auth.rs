use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    http::{HeaderMap, header},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config,
    management::SessionManager,
    types::{PendingLogin, Token, UserProfile, UserSession},
    utils, warning,
};

use super::SESSION_COOKIE;

/// Sign-ins that have been redirected to the authorization endpoint but
/// whose callback has not arrived yet, keyed by the `state` parameter.
pub type PendingLogins = Arc<Mutex<HashMap<String, PendingLogin>>>;

/// Starts the OAuth flow: generates a PKCE verifier and challenge, parks
/// the verifier under a fresh `state` token and redirects the browser to
/// the authorization endpoint.
pub async fn sign_in(Extension(pending): Extension<PendingLogins>) -> Redirect {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let state = utils::generate_state_token();

    {
        let mut lock = pending.lock().await;
        lock.insert(state.clone(), PendingLogin { code_verifier });
    }

    // access_type=offline asks for a refresh token so sessions can
    // outlive the first access token.
    let auth_url = format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}&state={state}&code_challenge={code_challenge}&code_challenge_method=S256&access_type=offline",
        auth_url = &config::oauth_auth_url(),
        client_id = &config::oauth_client_id(),
        redirect_uri = &config::oauth_redirect_uri(),
        scope = &config::oauth_scope().replace(' ', "%20"),
        state = state,
        code_challenge = code_challenge
    );

    Redirect::to(&auth_url)
}

/// Callback receiver for the OAuth process after log in. Exchanges the
/// authorization code, resolves the user's profile and opens a session.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(pending): Extension<PendingLogins>,
) -> Response {
    let (Some(code), Some(state)) = (params.get("code"), params.get("state")) else {
        return Html("<h4>Missing authorization code.</h4>").into_response();
    };

    // Take the code verifier parked by sign_in; an unknown state means
    // the flow was not started here.
    let Some(login) = pending.lock().await.remove(state) else {
        return Html("<h4>Unknown or expired sign-in attempt.</h4>").into_response();
    };

    let token = match exchange_code(code, &login.code_verifier).await {
        Ok(token) => token,
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            return Html("<h4>Login failed.</h4>").into_response();
        }
    };

    let profile = match fetch_profile(&token.access_token).await {
        Ok(profile) if !profile.id.is_empty() => profile,
        Ok(_) => {
            warning!("Userinfo endpoint returned no subject id.");
            return Html("<h4>Login failed.</h4>").into_response();
        }
        Err(e) => {
            warning!("Failed to fetch user profile: {}", e);
            return Html("<h4>Login failed.</h4>").into_response();
        }
    };

    match SessionManager::new()
        .create(UserSession { profile, token })
        .await
    {
        Ok(session_id) => {
            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                SESSION_COOKIE, session_id
            );
            (
                AppendHeaders([(header::SET_COOKIE, cookie)]),
                Redirect::to("/"),
            )
                .into_response()
        }
        Err(e) => {
            warning!("Failed to persist session: {:?}", e);
            Html("<h4>Login failed.</h4>").into_response()
        }
    }
}

/// Destroys the current session and redirects back to the login screen.
pub async fn logout(headers: HeaderMap) -> impl IntoResponse {
    if let Some(session_id) = super::session_id(&headers) {
        if let Err(e) = SessionManager::new().destroy(&session_id).await {
            warning!("Failed to destroy session: {:?}", e);
        }
    }

    let cookie = format!("{}=deleted; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::to("/"),
    )
}

async fn exchange_code(code: &str, verifier: &str) -> Result<Token, String> {
    let client_id = config::oauth_client_id();
    let client_secret = config::oauth_client_secret();
    let redirect_uri = config::oauth_redirect_uri();

    let client = Client::new();
    let res = client
        .post(&config::oauth_token_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let json: Value = res.json().await.map_err(|e| e.to_string())?;

    let access_token = json["access_token"].as_str().unwrap_or_default().to_string();
    if access_token.is_empty() {
        return Err(format!("token endpoint returned no access token: {}", json));
    }

    Ok(Token {
        access_token,
        refresh_token: json["refresh_token"].as_str().map(str::to_string),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

async fn fetch_profile(access_token: &str) -> Result<UserProfile, String> {
    let client = Client::new();
    let json: Value = client
        .get(&config::oauth_userinfo_url())
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| e.to_string())?
        .json()
        .await
        .map_err(|e| e.to_string())?;

    Ok(UserProfile {
        id: json["sub"].as_str().unwrap_or_default().to_string(),
        name: json["name"].as_str().unwrap_or_default().to_string(),
        avatar_url: json["picture"].as_str().map(str::to_string),
    })
}
