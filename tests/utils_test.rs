use photoframe::types::{MediaItem, SearchForm};
use photoframe::utils::*;
use serde_json::json;

// Helper function to create a test media item
fn create_test_item(id: &str, mime_type: Option<&str>) -> MediaItem {
    MediaItem {
        id: id.to_string(),
        description: None,
        product_url: None,
        base_url: Some(format!("https://photos.test/{}", id)),
        mime_type: mime_type.map(str::to_string),
        filename: None,
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should be deterministic - same input produces same output
    let challenge2 = generate_code_challenge(verifier);
    assert_eq!(challenge, challenge2);

    // Different input should produce different output
    let challenge3 = generate_code_challenge("different_verifier");
    assert_ne!(challenge, challenge3);

    // Should be base64-encoded (URL-safe, no padding)
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_generate_session_id_and_state() {
    let session_id = generate_session_id();
    assert_eq!(session_id.len(), 64);
    assert!(session_id.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(session_id, generate_session_id());

    let state = generate_state_token();
    assert_eq!(state.len(), 32);
    assert_ne!(state, generate_state_token());
}

#[test]
fn test_construct_date() {
    // All fields unset means no date at all
    assert_eq!(construct_date(&None, &None, &None), None);

    // Unset fields stay out of the date object (wildcards)
    let date = construct_date(&Some("2023".to_string()), &None, &None).unwrap();
    assert_eq!(date.year, Some(2023));
    assert_eq!(date.month, None);
    assert_eq!(date.day, None);

    let date = construct_date(
        &Some("2023".to_string()),
        &Some("10".to_string()),
        &Some("17".to_string()),
    )
    .unwrap();
    assert_eq!(date.year, Some(2023));
    assert_eq!(date.month, Some(10));
    assert_eq!(date.day, Some(17));

    // Empty, unparseable and zero values count as unset
    assert_eq!(
        construct_date(&Some("".to_string()), &Some("abc".to_string()), &Some("0".to_string())),
        None
    );
}

#[test]
fn test_build_search_params_defaults_to_photo_filter() {
    let params = build_search_params(&SearchForm::default()).unwrap();

    // Photos only, no categories, no dates - and nothing transient set
    let value = serde_json::to_value(&params).unwrap();
    assert_eq!(
        value,
        json!({
            "filters": {
                "contentFilter": {},
                "mediaTypeFilter": {"mediaTypes": ["PHOTO"]}
            }
        })
    );
}

#[test]
fn test_build_search_params_with_categories() {
    let form = SearchForm {
        included_categories: Some("LANDSCAPES".to_string()),
        excluded_categories: Some("SELFIES".to_string()),
        ..Default::default()
    };
    let params = build_search_params(&form).unwrap();

    let filters = params.filters.unwrap();
    assert_eq!(
        filters.content_filter.included_content_categories,
        Some(vec!["LANDSCAPES".to_string()])
    );
    assert_eq!(
        filters.content_filter.excluded_content_categories,
        Some(vec!["SELFIES".to_string()])
    );
}

#[test]
fn test_build_search_params_exact_date() {
    let form = SearchForm {
        date_filter: Some("exact".to_string()),
        exact_year: Some("2022".to_string()),
        ..Default::default()
    };
    let params = build_search_params(&form).unwrap();

    let date_filter = params.filters.unwrap().date_filter.unwrap();
    let dates = date_filter.dates.unwrap();
    assert_eq!(dates.len(), 1);
    assert_eq!(dates[0].year, Some(2022));
    assert!(date_filter.ranges.is_none());

    // Exact mode with no date fields set drops the date filter entirely
    let form = SearchForm {
        date_filter: Some("exact".to_string()),
        ..Default::default()
    };
    let params = build_search_params(&form).unwrap();
    assert!(params.filters.unwrap().date_filter.is_none());
}

#[test]
fn test_build_search_params_date_range() {
    let form = SearchForm {
        date_filter: Some("range".to_string()),
        start_year: Some("2020".to_string()),
        end_year: Some("2021".to_string()),
        end_month: Some("6".to_string()),
        ..Default::default()
    };
    let params = build_search_params(&form).unwrap();

    let ranges = params
        .filters
        .unwrap()
        .date_filter
        .unwrap()
        .ranges
        .unwrap();
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].start_date.year, Some(2020));
    assert_eq!(ranges[0].end_date.year, Some(2021));
    assert_eq!(ranges[0].end_date.month, Some(6));
}

#[test]
fn test_build_search_params_range_with_one_bound_fails() {
    let form = SearchForm {
        date_filter: Some("range".to_string()),
        start_year: Some("2020".to_string()),
        ..Default::default()
    };
    let result = build_search_params(&form);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("start and an end"));

    // Range mode with neither bound is treated as no date constraint
    let form = SearchForm {
        date_filter: Some("range".to_string()),
        ..Default::default()
    };
    let params = build_search_params(&form).unwrap();
    assert!(params.filters.unwrap().date_filter.is_none());
}

#[test]
fn test_filter_image_items() {
    let raw = vec![
        None,
        Some(create_test_item("", Some("image/png"))),
        Some(create_test_item("video1", Some("video/mp4"))),
        Some(create_test_item("photo1", Some("image/jpeg"))),
        Some(create_test_item("unknown1", None)),
        Some(create_test_item("photo2", Some("image/png"))),
    ];

    let items = filter_image_items(raw);

    // Gaps, id-less entries and non-images are gone; an item without a
    // mime type survives; server order is preserved
    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["photo1", "unknown1", "photo2"]);
}

#[test]
fn test_compact_albums() {
    let raw = vec![
        None,
        Some(photoframe::types::Album {
            id: "album1".to_string(),
            title: Some("Holiday".to_string()),
            product_url: None,
            cover_photo_base_url: None,
            media_items_count: Some("12".to_string()),
        }),
        None,
    ];

    let albums = compact_albums(raw);
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].id, "album1");
}

#[test]
fn test_search_params_serialization_skips_unset_fields() {
    let params = photoframe::types::SearchParams {
        album_id: Some("album42".to_string()),
        ..Default::default()
    };

    // A stored album query must serialize to exactly the albumId, so a
    // replay resubmits the same request the user made
    assert_eq!(
        serde_json::to_value(&params).unwrap(),
        json!({"albumId": "album42"})
    );
}
