use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{
    Album, ApiDate, ContentFilter, DateFilter, DateRange, Filters, MediaItem, MediaTypeFilter,
    SearchForm, SearchParams,
};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn generate_state_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

pub fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

fn parse_date_field(value: &Option<String>) -> Option<u16> {
    value
        .as_deref()
        .and_then(|v| v.trim().parse::<u16>().ok())
        .filter(|v| *v != 0)
}

/// Builds a date for the Library API. Unset fields are left out of the
/// date object, which the API treats as a wildcard. Returns `None` when
/// every field is unset.
pub fn construct_date(
    year: &Option<String>,
    month: &Option<String>,
    day: &Option<String>,
) -> Option<ApiDate> {
    let date = ApiDate {
        year: parse_date_field(year),
        month: parse_date_field(month).and_then(|m| u8::try_from(m).ok()),
        day: parse_date_field(day).and_then(|d| u8::try_from(d).ok()),
    };

    if date.year.is_none() && date.month.is_none() && date.day.is_none() {
        None
    } else {
        Some(date)
    }
}

/// Normalizes the search form into the request shape submitted to the
/// Library API. Media type is always restricted to photos; category and
/// date constraints are added when the form provides them.
///
/// The only structural error is a date range with exactly one bound: a
/// missing bound has no wildcard meaning, so that input is rejected.
pub fn build_search_params(form: &SearchForm) -> Result<SearchParams, String> {
    let mut filters = Filters {
        content_filter: ContentFilter::default(),
        media_type_filter: MediaTypeFilter {
            media_types: vec!["PHOTO".to_string()],
        },
        date_filter: None,
    };

    if let Some(category) = form.included_categories.as_deref().filter(|c| !c.is_empty()) {
        filters.content_filter.included_content_categories = Some(vec![category.to_string()]);
    }

    if let Some(category) = form.excluded_categories.as_deref().filter(|c| !c.is_empty()) {
        filters.content_filter.excluded_content_categories = Some(vec![category.to_string()]);
    }

    match form.date_filter.as_deref() {
        Some("exact") => {
            if let Some(date) = construct_date(&form.exact_year, &form.exact_month, &form.exact_day)
            {
                filters.date_filter = Some(DateFilter {
                    dates: Some(vec![date]),
                    ranges: None,
                });
            }
        }
        Some("range") => {
            let start = construct_date(&form.start_year, &form.start_month, &form.start_day);
            let end = construct_date(&form.end_year, &form.end_month, &form.end_day);
            match (start, end) {
                (Some(start_date), Some(end_date)) => {
                    filters.date_filter = Some(DateFilter {
                        dates: None,
                        ranges: Some(vec![DateRange {
                            start_date,
                            end_date,
                        }]),
                    });
                }
                (None, None) => {}
                _ => return Err("a date range needs both a start and an end date".to_string()),
            }
        }
        _ => {}
    }

    Ok(SearchParams {
        filters: Some(filters),
        ..Default::default()
    })
}

/// Removes invalid entries from one page of media items. The raw arrays
/// returned by the API may be sparse, so gaps are dropped first, then
/// items without an id and items whose mime type marks them as something
/// other than an image. Media type filters cannot be applied when an
/// album is loaded, so this runs on every page regardless of query shape.
pub fn filter_image_items(raw: Vec<Option<MediaItem>>) -> Vec<MediaItem> {
    raw.into_iter()
        .flatten()
        .filter(|item| !item.id.is_empty())
        .filter(|item| match &item.mime_type {
            Some(mime) => mime.starts_with("image/"),
            None => true,
        })
        .collect()
}

/// Drops gaps from one page of albums. Albums carry no mime type, so no
/// further filtering applies.
pub fn compact_albums(raw: Vec<Option<Album>>) -> Vec<Album> {
    raw.into_iter().flatten().collect()
}
