//! Data API error classification

use reqwest::StatusCode;
use storage_health::errors::StoreError;
use storage_health::store::rest::classify_rest_error;

#[test]
fn test_schema_cache_code_is_transient() {
    let body = r#"{"code":"PGRST204","message":"Could not find the 'max_upload_mb' column of 'storage_settings' in the schema cache"}"#;
    let error = classify_rest_error("upsert", StatusCode::BAD_REQUEST, body);
    assert!(error.is_schema_cache_transient());
}

#[test]
fn test_schema_cache_message_without_code_is_transient() {
    let body = r#"{"message":"relation missing from Schema Cache"}"#;
    let error = classify_rest_error("upsert", StatusCode::NOT_FOUND, body);
    assert!(error.is_schema_cache_transient());
}

#[test]
fn test_other_failures_are_not_retried() {
    let body = r#"{"code":"42501","message":"permission denied for table storage_settings"}"#;
    let error = classify_rest_error("upsert", StatusCode::FORBIDDEN, body);
    assert_eq!(
        error,
        StoreError::CallFailed {
            operation: "upsert".to_string(),
            message: "permission denied for table storage_settings".to_string(),
        }
    );
}

#[test]
fn test_non_json_body_is_kept_in_message() {
    let error = classify_rest_error("fetch", StatusCode::BAD_GATEWAY, "upstream down\n");
    match error {
        StoreError::CallFailed { message, .. } => {
            assert_eq!(message, "HTTP 502: upstream down");
        }
        other => panic!("unexpected error {:?}", other),
    }
}
