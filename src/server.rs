use axum::{
    Extension, Router,
    routing::{get, post},
};
use std::{collections::HashMap, net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config, error, info};

pub async fn start_api_server() {
    let pending: api::PendingLogins = Arc::new(Mutex::new(HashMap::new()));

    let app = Router::new()
        .route("/", get(api::index))
        .route("/search", get(api::search_page))
        .route("/album", get(api::album_page))
        .route("/health", get(api::health))
        .route("/logout", get(api::logout))
        .route(
            "/auth/google",
            get(api::sign_in).layer(Extension(Arc::clone(&pending))),
        )
        .route(
            "/auth/google/callback",
            get(api::callback).layer(Extension(pending)),
        )
        .route("/loadFromSearch", post(api::load_from_search))
        .route("/loadFromAlbum", post(api::load_from_album))
        .route("/getQueue", get(api::get_queue))
        .route("/getSelected", get(api::get_selected))
        .route("/getAlbums", get(api::get_albums));

    let addr = match SocketAddr::from_str(&config::server_addr()) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("App listening on http://{}", addr);
    axum::serve(listener, app).await.unwrap();
}
