//! Target resolution and status classification per probe kind

use storage_health::config::AppConfig;
use storage_health::probe::{classify_status, default_function_catalog, ProbeTargets};
use storage_health::types::{ProbeErrorKind, ProbeKind, ProbePayload, StorageSettings};

fn config() -> AppConfig {
    let mut config = AppConfig::get_defaults().unwrap();
    config.storage.bucket_name = "configured-bucket".to_string();
    config.storage.region = "us-east-1".to_string();
    config.backend.base_url = "https://backend.example.test/".to_string();
    config
}

#[test]
fn test_saved_settings_override_configured_bucket() {
    let settings = StorageSettings::new("saved-bucket", "eu-central-1");
    let targets = ProbeTargets::resolve(&config(), Some(&settings));
    assert_eq!(targets.bucket_name, "saved-bucket");
    assert!(targets.storage_url.contains("eu-central-1"));
    assert!(targets.storage_url.ends_with("/saved-bucket/"));
}

#[test]
fn test_explicit_endpoint_host_wins_over_template() {
    let mut settings = StorageSettings::new("saved-bucket", "eu-central-1");
    settings.endpoint_host = Some("storage.internal.test".to_string());
    let targets = ProbeTargets::resolve(&config(), Some(&settings));
    assert!(targets
        .storage_url
        .ends_with("://storage.internal.test/saved-bucket/"));
}

#[test]
fn test_topology_specs() {
    let targets = ProbeTargets::resolve(&config(), None);

    let reachability = targets.reachability_spec();
    assert_eq!(reachability.kind, ProbeKind::Reachability);
    assert_eq!(reachability.url, targets.storage_url);

    let health = targets.backend_health_spec();
    assert_eq!(health.kind, ProbeKind::BackendHealth);
    assert!(health
        .url
        .starts_with("https://backend.example.test/functions/v1/"));

    let upload = targets.upload_spec();
    assert_eq!(upload.kind, ProbeKind::Upload);
    match upload.payload {
        ProbePayload::Multipart {
            content, folder, ..
        } => {
            assert_eq!(content.len(), 1024);
            assert!(folder.contains("non-production"));
        }
        other => panic!("expected multipart payload, got {:?}", other),
    }
}

#[test]
fn test_reachability_accepts_forbidden_and_redirect() {
    for status in [200, 204, 301, 403] {
        assert_eq!(
            classify_status(ProbeKind::Reachability, status),
            ProbeErrorKind::None,
            "status {}",
            status
        );
    }
    for status in [302, 404, 500] {
        assert_eq!(
            classify_status(ProbeKind::Reachability, status),
            ProbeErrorKind::Rejected
        );
    }
}

#[test]
fn test_upload_rejects_anything_but_2xx() {
    assert_eq!(classify_status(ProbeKind::Upload, 201), ProbeErrorKind::None);
    assert_eq!(
        classify_status(ProbeKind::Upload, 403),
        ProbeErrorKind::Rejected
    );
    assert_eq!(
        classify_status(ProbeKind::Upload, 500),
        ProbeErrorKind::Rejected
    );
}

#[test]
fn test_functions_use_generic_classification() {
    assert_eq!(
        classify_status(ProbeKind::Function, 401),
        ProbeErrorKind::ClientError
    );
    assert_eq!(
        classify_status(ProbeKind::BackendHealth, 502),
        ProbeErrorKind::ServerError
    );
}

#[test]
fn test_every_catalog_function_resolves_to_backend_url() {
    let targets = ProbeTargets::resolve(&config(), None);
    for function in default_function_catalog() {
        let spec = function.resolve(&targets, "some/key.txt");
        assert_eq!(spec.kind, ProbeKind::Function);
        assert_eq!(
            spec.url,
            format!("https://backend.example.test/functions/v1/{}", function.slug)
        );
    }
}
