use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub profile: UserProfile,
    pub token: Token,
}

/// Verifier for an OAuth sign-in that has been started but whose callback
/// has not arrived yet, keyed by the `state` parameter.
#[derive(Debug, Clone)]
pub struct PendingLogin {
    pub code_verifier: String,
}

/// One media item as returned by the Library API. Only `id` and `mimeType`
/// matter to the aggregation filter; the remaining fields are passed
/// through to the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(default)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    #[serde(default)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_photo_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_items_count: Option<String>,
}

/// The normalized shape of a Library API request. Exactly one of
/// `filters`, `album_id` and `media_item_ids` is set at construction.
/// `page_size` and `page_token` are transient pagination state: the
/// aggregation loop owns them while it runs and the orchestrator strips
/// them before the query is persisted for replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<Filters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_item_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub content_filter: ContentFilter,
    pub media_type_filter: MediaTypeFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_filter: Option<DateFilter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included_content_categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_content_categories: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTypeFilter {
    pub media_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<ApiDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranges: Option<Vec<DateRange>>,
}

/// A date for the Library API. Fields left unset act as wildcards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: ApiDate,
    pub end_date: ApiDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMediaItemsResponse {
    pub media_items: Option<Vec<Option<MediaItem>>>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetMediaItemsResponse {
    pub media_item_results: Option<Vec<Option<MediaItemResult>>>,
    pub next_page_token: Option<String>,
}

/// Per-id wrapper used by the batch-get endpoint. Ids that could not be
/// resolved come back without a `media_item`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemResult {
    pub media_item: Option<MediaItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAlbumsResponse {
    pub albums: Option<Vec<Option<Album>>>,
    pub next_page_token: Option<String>,
}

/// Canonical error shape for everything that can go wrong while talking
/// to the Library API. Structured remote errors are surfaced verbatim;
/// transport failures are normalized into the same shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
}

impl ApiError {
    /// Normalizes a reqwest failure (connect error, decode error, ...)
    /// into the canonical error shape.
    pub fn from_transport(err: reqwest::Error) -> Self {
        ApiError {
            name: Some("TransportError".to_string()),
            code: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }

    /// Builds an error from a non-success HTTP status whose body carried
    /// no parseable structured error.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        ApiError {
            name: status.canonical_reason().map(str::to_string),
            code: Some(status.as_u16()),
            message: format!("request failed with status {}", status),
        }
    }

    /// Builds a server-side error, e.g. for cache writes that failed.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError {
            name: Some("InternalError".to_string()),
            code: Some(500),
            message: message.into(),
        }
    }

    /// The HTTP status to answer with, defaulting to 500.
    pub fn status_code(&self) -> u16 {
        self.code.unwrap_or(500)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} ({})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Envelope the Library API wraps structured errors in.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: ApiError,
}

/// Payload returned to the frontend for all queue endpoints. Both fields
/// absent means "nothing loaded yet", which serializes to `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_items: Option<Vec<MediaItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<SearchParams>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumsResponse {
    pub albums: Vec<Album>,
}

/// Raw form input from the search page. All fields arrive as strings;
/// empty or unparseable values are treated as unset, matching the form's
/// optional inputs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchForm {
    pub included_categories: Option<String>,
    pub excluded_categories: Option<String>,
    pub date_filter: Option<String>,
    pub exact_year: Option<String>,
    pub exact_month: Option<String>,
    pub exact_day: Option<String>,
    pub start_year: Option<String>,
    pub start_month: Option<String>,
    pub start_day: Option<String>,
    pub end_year: Option<String>,
    pub end_month: Option<String>,
    pub end_day: Option<String>,
}

#[derive(Tabled)]
pub struct CacheTableRow {
    pub namespace: String,
    pub user: String,
    pub age: String,
}
