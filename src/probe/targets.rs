//! Probe target resolution
//!
//! Turns configuration (and, when present, the persisted settings record) into
//! the concrete URLs each probe hits.

use crate::config::{AppConfig, BackendConfig};
use crate::types::{HttpMethod, ProbeKind, ProbePayload, ProbeSpec, StorageSettings};

/// Folder the synthetic upload lands in; marked non-production for cleanup jobs
pub const UPLOAD_PROBE_FOLDER: &str = "health-checks/non-production";

/// Size of the synthetic upload file in bytes
pub const UPLOAD_PROBE_SIZE: usize = 1024;

const UPLOAD_PROBE_FILE_NAME: &str = "connectivity-probe.txt";

/// Resolved endpoints for one health run
#[derive(Debug, Clone)]
pub struct ProbeTargets {
    pub storage_url: String,
    pub bucket_name: String,
    pub backend: BackendConfig,
}

impl ProbeTargets {
    /// Build targets from configuration, letting saved settings override bucket, region and host
    pub fn resolve(config: &AppConfig, settings: Option<&StorageSettings>) -> Self {
        let bucket_name = settings
            .map(|s| s.bucket_name.clone())
            .unwrap_or_else(|| config.storage.bucket_name.clone());
        let region = settings
            .map(|s| s.region.clone())
            .unwrap_or_else(|| config.storage.region.clone());
        let host = settings
            .and_then(|s| s.endpoint_host.clone())
            .unwrap_or_else(|| config.storage.endpoint_template.replace("{region}", &region));

        Self {
            storage_url: format!("{}://{}/{}/", config.storage.scheme, host, bucket_name),
            bucket_name,
            backend: config.backend.clone(),
        }
    }

    /// Full URL of a backend function by slug
    pub fn function_url(&self, slug: &str) -> String {
        self.backend.function_url(slug)
    }

    pub fn reachability_spec(&self) -> ProbeSpec {
        ProbeSpec {
            name: "storage-reachability".to_string(),
            kind: ProbeKind::Reachability,
            method: HttpMethod::Head,
            url: self.storage_url.clone(),
            payload: ProbePayload::Empty,
        }
    }

    pub fn backend_health_spec(&self) -> ProbeSpec {
        ProbeSpec {
            name: "backend-health".to_string(),
            kind: ProbeKind::BackendHealth,
            method: HttpMethod::Post,
            url: self.function_url(&self.backend.health_function),
            payload: ProbePayload::Empty,
        }
    }

    pub fn upload_spec(&self) -> ProbeSpec {
        ProbeSpec {
            name: "upload-roundtrip".to_string(),
            kind: ProbeKind::Upload,
            method: HttpMethod::Post,
            url: self.function_url(&self.backend.upload_function),
            payload: synthetic_upload_payload(),
        }
    }
}

/// Fixed-size synthetic file used by the upload probe and the upload smoke test
pub fn synthetic_upload_payload() -> ProbePayload {
    let header = b"storage-health connectivity probe\n";
    let mut content = Vec::with_capacity(UPLOAD_PROBE_SIZE);
    content.extend_from_slice(header);
    content.resize(UPLOAD_PROBE_SIZE, b'.');

    ProbePayload::Multipart {
        file_name: UPLOAD_PROBE_FILE_NAME.to_string(),
        content,
        folder: UPLOAD_PROBE_FOLDER.to_string(),
    }
}
