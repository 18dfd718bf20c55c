use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{Extension, Json, Router, http::StatusCode, routing::{get, post}};
use photoframe::library::LibraryClient;
use photoframe::management::{ALBUM_CACHE_TTL, MEDIA_ITEM_CACHE_TTL, QueueManager, UserCache};
use photoframe::types::{Album, MediaItem, SearchForm, SearchParams};
use photoframe::utils::build_search_params;
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::time::sleep;

const USER: &str = "user-1";

// Canned paginated search endpoint, as in library_test: "page-{n}"
// tokens link the canned pages, unknown pages answer with a remote error.
struct PagedFixture {
    hits: AtomicUsize,
    pages: Vec<Value>,
}

impl PagedFixture {
    fn new(pages: Vec<Value>) -> Arc<Self> {
        Arc::new(PagedFixture {
            hits: AtomicUsize::new(0),
            pages,
        })
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn paged_post_handler(
    Extension(fx): Extension<Arc<PagedFixture>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    fx.hits.fetch_add(1, Ordering::SeqCst);
    let index = match body.get("pageToken").and_then(Value::as_str) {
        None => 0,
        Some(token) => token.trim_start_matches("page-").parse().unwrap(),
    };
    match fx.pages.get(index) {
        Some(page) => (StatusCode::OK, Json(page.clone())),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": {"code": 500, "message": "backend exploded", "status": "INTERNAL"}
            })),
        ),
    }
}

async fn albums_handler(Extension(fx): Extension<Arc<PagedFixture>>) -> Json<Value> {
    fx.hits.fetch_add(1, Ordering::SeqCst);
    Json(fx.pages[0].clone())
}

async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn image(id: &str) -> Value {
    json!({"id": id, "mimeType": "image/jpeg", "baseUrl": format!("https://photos.test/{}", id)})
}

fn search_page(ids: &[&str], next: Option<&str>) -> Value {
    let mut page = json!({
        "mediaItems": ids.iter().map(|id| image(id)).collect::<Vec<_>>()
    });
    if let Some(next) = next {
        page["nextPageToken"] = json!(next);
    }
    page
}

struct TestHarness {
    manager: QueueManager,
    media_items: UserCache<Vec<MediaItem>>,
    albums: UserCache<Vec<Album>>,
    queries: UserCache<SearchParams>,
    _dir: TempDir,
}

// Builds a manager over caches rooted in a tempdir, plus independent
// handles on the same namespaces for inspecting tier state.
fn harness(base_url: &str, media_ttl: Duration) -> TestHarness {
    let dir = tempfile::tempdir().unwrap();
    let manager = QueueManager::with_parts(
        LibraryClient::with_base_url(base_url),
        UserCache::at_root(dir.path(), "media-item-cache", Some(media_ttl)),
        UserCache::at_root(dir.path(), "album-cache", Some(ALBUM_CACHE_TTL)),
        UserCache::at_root(dir.path(), "query-storage", None),
    );
    TestHarness {
        manager,
        media_items: UserCache::at_root(dir.path(), "media-item-cache", Some(media_ttl)),
        albums: UserCache::at_root(dir.path(), "album-cache", Some(ALBUM_CACHE_TTL)),
        queries: UserCache::at_root(dir.path(), "query-storage", None),
        _dir: dir,
    }
}

fn landscapes_params() -> SearchParams {
    build_search_params(&SearchForm {
        included_categories: Some("LANDSCAPES".to_string()),
        ..Default::default()
    })
    .unwrap()
}

fn search_router(fx: &Arc<PagedFixture>) -> Router {
    Router::new().route(
        "/v1/mediaItems:search",
        post(paged_post_handler).layer(Extension(Arc::clone(fx))),
    )
}

#[tokio::test]
async fn test_load_queue_populates_both_tiers() {
    let a_ids: Vec<String> = (0..100).map(|i| format!("a{i}")).collect();
    let b_ids: Vec<String> = (0..60).map(|i| format!("b{i}")).collect();
    let a_refs: Vec<&str> = a_ids.iter().map(String::as_str).collect();
    let b_refs: Vec<&str> = b_ids.iter().map(String::as_str).collect();
    let fx = PagedFixture::new(vec![
        search_page(&a_refs, Some("page-1")),
        search_page(&b_refs, None),
    ]);
    let base_url = spawn_app(search_router(&fx)).await;
    let harness = harness(&base_url, MEDIA_ITEM_CACHE_TTL);

    let response = harness
        .manager
        .load_queue(USER, "token", landscapes_params())
        .await
        .unwrap();

    assert_eq!(response.media_items.as_ref().unwrap().len(), 160);
    assert_eq!(fx.hits(), 2);

    // Hot tier holds the full aggregate
    let cached = harness.media_items.get(USER).await.unwrap();
    assert_eq!(cached.len(), 160);

    // Durable tier holds the query with pagination state stripped
    let stored = harness.queries.get(USER).await.unwrap();
    assert!(stored.page_token.is_none());
    assert!(stored.page_size.is_none());
    assert_eq!(stored.filters, landscapes_params().filters);
}

#[tokio::test]
async fn test_current_queue_with_nothing_stored_is_empty_success() {
    let fx = PagedFixture::new(vec![search_page(&["a1"], None)]);
    let base_url = spawn_app(search_router(&fx)).await;
    let harness = harness(&base_url, MEDIA_ITEM_CACHE_TTL);

    let response = harness.manager.current_queue(USER, "token").await.unwrap();

    // Empty success, not an error - and the remote was never called
    assert!(response.media_items.is_none());
    assert!(response.parameters.is_none());
    assert_eq!(fx.hits(), 0);
    assert_eq!(serde_json::to_value(&response).unwrap(), json!({}));
}

#[tokio::test]
async fn test_current_queue_serves_hot_cache_without_remote_calls() {
    let fx = PagedFixture::new(vec![search_page(&["a1", "a2"], None)]);
    let base_url = spawn_app(search_router(&fx)).await;
    let harness = harness(&base_url, MEDIA_ITEM_CACHE_TTL);

    harness
        .manager
        .load_queue(USER, "token", landscapes_params())
        .await
        .unwrap();
    assert_eq!(fx.hits(), 1);

    let response = harness.manager.current_queue(USER, "token").await.unwrap();

    assert_eq!(response.media_items.unwrap().len(), 2);
    assert_eq!(response.parameters, harness.queries.get(USER).await);
    assert_eq!(fx.hits(), 1);
}

#[tokio::test]
async fn test_current_queue_replays_stored_query_after_expiry() {
    let fx = PagedFixture::new(vec![search_page(&["a1", "a2", "a3"], None)]);
    let base_url = spawn_app(search_router(&fx)).await;
    // Hot tier expires almost immediately; the durable tier never does
    let harness = harness(&base_url, Duration::from_millis(100));

    harness
        .manager
        .load_queue(USER, "token", landscapes_params())
        .await
        .unwrap();
    assert_eq!(fx.hits(), 1);
    let stored_before = harness.queries.get(USER).await.unwrap();

    sleep(Duration::from_millis(250)).await;

    let response = harness.manager.current_queue(USER, "token").await.unwrap();

    // Exactly one replay happened and refilled the hot tier
    assert_eq!(fx.hits(), 2);
    assert_eq!(response.media_items.unwrap().len(), 3);
    assert!(harness.media_items.get(USER).await.is_some());

    // The durable query is untouched by the replay
    assert_eq!(harness.queries.get(USER).await.unwrap(), stored_before);
}

#[tokio::test]
async fn test_selected_items_filters_hot_cache_in_cache_order() {
    let fx = PagedFixture::new(vec![search_page(&["a1", "a2", "a3", "a4"], None)]);
    let base_url = spawn_app(search_router(&fx)).await;
    let harness = harness(&base_url, MEDIA_ITEM_CACHE_TTL);

    harness
        .manager
        .load_queue(USER, "token", landscapes_params())
        .await
        .unwrap();
    assert_eq!(fx.hits(), 1);

    // Request out of order and include an id that was never loaded
    let ids = vec!["a3".to_string(), "a1".to_string(), "zz".to_string()];
    let response = harness
        .manager
        .selected_items(USER, "token", &ids)
        .await
        .unwrap();

    let got: Vec<String> = response
        .media_items
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(got, vec!["a1".to_string(), "a3".to_string()]);

    // Served entirely from cache
    assert_eq!(fx.hits(), 1);
}

#[tokio::test]
async fn test_selected_items_fallback_fetches_without_caching() {
    let page = json!({
        "mediaItemResults": [
            {"mediaItem": image("sel1")},
            {"mediaItem": image("sel2")},
        ]
    });
    let fx = PagedFixture::new(vec![page]);
    let app = Router::new().route(
        "/v1/mediaItems:batchGet",
        post(paged_post_handler).layer(Extension(Arc::clone(&fx))),
    );
    let base_url = spawn_app(app).await;
    let harness = harness(&base_url, MEDIA_ITEM_CACHE_TTL);

    let ids = vec!["sel1".to_string(), "sel2".to_string()];
    let response = harness
        .manager
        .selected_items(USER, "token", &ids)
        .await
        .unwrap();

    assert_eq!(response.media_items.unwrap().len(), 2);
    assert_eq!(fx.hits(), 1);

    // This path is explicitly non-caching
    assert!(harness.media_items.get(USER).await.is_none());
    assert!(harness.queries.get(USER).await.is_none());
}

#[tokio::test]
async fn test_failed_load_leaves_previous_cache_entries_intact() {
    // The fixture has no pages at all, so the first request fails
    let fx = PagedFixture::new(vec![]);
    let base_url = spawn_app(search_router(&fx)).await;
    let harness = harness(&base_url, MEDIA_ITEM_CACHE_TTL);

    // A previous successful load left both tiers populated
    let old_items = vec![MediaItem {
        id: "old1".to_string(),
        description: None,
        product_url: None,
        base_url: None,
        mime_type: Some("image/jpeg".to_string()),
        filename: None,
    }];
    harness.media_items.set(USER, old_items.clone()).await.unwrap();
    harness
        .queries
        .set(USER, landscapes_params())
        .await
        .unwrap();

    let result = harness
        .manager
        .load_queue(USER, "token", SearchParams {
            album_id: Some("album-9".to_string()),
            ..Default::default()
        })
        .await;

    let error = result.unwrap_err();
    assert_eq!(error.code, Some(500));
    assert_eq!(error.message, "backend exploded");

    // Neither tier was touched by the failed submission
    let cached = harness.media_items.get(USER).await.unwrap();
    assert_eq!(cached[0].id, "old1");
    assert_eq!(harness.queries.get(USER).await.unwrap(), landscapes_params());
}

#[tokio::test]
async fn test_failed_replay_leaves_durable_query_intact() {
    let fx = PagedFixture::new(vec![]);
    let base_url = spawn_app(search_router(&fx)).await;
    let harness = harness(&base_url, MEDIA_ITEM_CACHE_TTL);

    // Only the durable tier is populated, as after hot-cache expiry
    harness
        .queries
        .set(USER, landscapes_params())
        .await
        .unwrap();

    let result = harness.manager.current_queue(USER, "token").await;

    assert!(result.is_err());
    assert_eq!(fx.hits(), 1);
    assert!(harness.media_items.get(USER).await.is_none());
    assert_eq!(harness.queries.get(USER).await.unwrap(), landscapes_params());
}

#[tokio::test]
async fn test_list_albums_serves_second_request_from_cache() {
    let page = json!({
        "albums": [
            {"id": "album1", "title": "Holiday"},
            {"id": "album2", "title": "Garden"},
        ]
    });
    let fx = PagedFixture::new(vec![page]);
    let app = Router::new().route(
        "/v1/albums",
        get(albums_handler).layer(Extension(Arc::clone(&fx))),
    );
    let base_url = spawn_app(app).await;
    let harness = harness(&base_url, MEDIA_ITEM_CACHE_TTL);

    let first = harness.manager.list_albums(USER, "token").await.unwrap();
    let second = harness.manager.list_albums(USER, "token").await.unwrap();

    assert_eq!(first.albums.len(), 2);
    assert_eq!(second.albums.len(), 2);
    assert_eq!(fx.hits(), 1);
    assert!(harness.albums.get(USER).await.is_some());
}

#[tokio::test]
async fn test_list_albums_error_does_not_populate_cache() {
    async fn failing_albums() -> (StatusCode, Json<Value>) {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": {"code": 503, "message": "try later", "status": "UNAVAILABLE"}
            })),
        )
    }

    let app = Router::new().route("/v1/albums", get(failing_albums));
    let base_url = spawn_app(app).await;
    let harness = harness(&base_url, MEDIA_ITEM_CACHE_TTL);

    let error = harness.manager.list_albums(USER, "token").await.unwrap_err();

    assert_eq!(error.code, Some(503));
    assert!(harness.albums.get(USER).await.is_none());
}
