use crate::config::{BackendConfig, ProbeConfig};
use crate::errors::AppResult;
use crate::types::{
    HttpMethod, ProbeErrorKind, ProbeKind, ProbeOutcome, ProbePayload, ProbeResponse, ProbeSpec,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::redirect::Policy;
use reqwest::{multipart, Client, RequestBuilder};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Longest slice of a response body kept in an outcome's detail text
const DETAIL_BODY_LIMIT: usize = 200;

/// Issues one probe and reduces whatever happened to a [`ProbeResponse`]
///
/// Implementations must not fail: transport errors, timeouts and unexpected
/// statuses all come back as a non-ok outcome.
pub trait ProbeClient: Send + Sync {
    fn probe<'a>(&'a self, spec: &'a ProbeSpec) -> BoxFuture<'a, ProbeResponse>;
}

/// Map an HTTP status onto the probe kind's contract
///
/// - Reachability: 2xx, 301 and 403 are success (403 = reachable, access restricted)
/// - Upload: only 2xx is success, anything else is rejected
/// - Backend health and functions: generic 2xx/4xx/5xx classification
pub fn classify_status(kind: ProbeKind, status: u16) -> ProbeErrorKind {
    match kind {
        ProbeKind::Reachability => match status {
            200..=299 | 301 | 403 => ProbeErrorKind::None,
            _ => ProbeErrorKind::Rejected,
        },
        ProbeKind::Upload => match status {
            200..=299 => ProbeErrorKind::None,
            _ => ProbeErrorKind::Rejected,
        },
        ProbeKind::BackendHealth | ProbeKind::Function => ProbeErrorKind::from_status(status),
    }
}

/// reqwest-backed probe client
pub struct HttpProbeClient {
    client: Client,
    api_key: Option<String>,
    timeout_seconds: u64,
}

impl HttpProbeClient {
    /// Create a client with a bounded per-request timeout
    ///
    /// Redirects are not followed so a 301 from the storage endpoint is observed as such.
    pub fn new(probe: &ProbeConfig, backend: &BackendConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(probe.timeout_seconds))
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            api_key: backend.api_key.clone(),
            timeout_seconds: probe.timeout_seconds,
        })
    }

    fn build_request(&self, spec: &ProbeSpec) -> RequestBuilder {
        let mut request = match spec.method {
            HttpMethod::Get => self.client.get(&spec.url),
            HttpMethod::Head => self.client.head(&spec.url),
            HttpMethod::Post => self.client.post(&spec.url),
            HttpMethod::Delete => self.client.delete(&spec.url),
        };

        // The backend key is never sent to the storage host
        if spec.kind != ProbeKind::Reachability {
            if let Some(key) = &self.api_key {
                request = request.header("apikey", key).bearer_auth(key);
            }
        }

        match &spec.payload {
            ProbePayload::Empty => request,
            ProbePayload::Json(body) => request.json(body),
            ProbePayload::Query(params) => request.query(params),
            ProbePayload::Multipart {
                file_name,
                content,
                folder,
            } => {
                let part = multipart::Part::bytes(content.clone()).file_name(file_name.clone());
                let form = multipart::Form::new()
                    .part("file", part)
                    .text("folder", folder.clone());
                request.multipart(form)
            }
        }
    }

    async fn execute(&self, spec: &ProbeSpec) -> ProbeResponse {
        let started = Instant::now();
        debug!("Probe {} -> {} {}", spec.name, spec.method, spec.url);

        let response = match self.build_request(spec).send().await {
            Ok(response) => response,
            Err(e) => {
                let latency_ms = started.elapsed().as_millis() as u64;
                let detail = if e.is_timeout() {
                    format!("timed out after {}s", self.timeout_seconds)
                } else {
                    format!("transport error: {}", e)
                };
                warn!("Probe {} failed: {}", spec.name, detail);
                return ProbeResponse::without_body(ProbeOutcome::network_error(
                    &spec.name, latency_ms, detail,
                ));
            }
        };

        let status = response.status().as_u16();
        // A body that cannot be read is treated as absent; the status still counts
        let text = response.text().await.unwrap_or_default();
        let latency_ms = started.elapsed().as_millis() as u64;
        let body = serde_json::from_str::<serde_json::Value>(&text).ok();

        let error_kind = classify_status(spec.kind, status);
        let outcome = if error_kind == ProbeErrorKind::None {
            ProbeOutcome::success(
                &spec.name,
                Some(status),
                latency_ms,
                success_detail(spec.kind, status),
            )
        } else {
            ProbeOutcome::failure(
                &spec.name,
                Some(status),
                error_kind,
                latency_ms,
                failure_detail(status, &text),
            )
        };

        ProbeResponse::new(outcome, body)
    }
}

impl ProbeClient for HttpProbeClient {
    fn probe<'a>(&'a self, spec: &'a ProbeSpec) -> BoxFuture<'a, ProbeResponse> {
        self.execute(spec).boxed()
    }
}

fn success_detail(kind: ProbeKind, status: u16) -> String {
    match (kind, status) {
        (ProbeKind::Reachability, 403) => "HTTP 403: reachable, access restricted".to_string(),
        (ProbeKind::Reachability, 301) => "HTTP 301: reachable, bucket redirects".to_string(),
        _ => format!("HTTP {}", status),
    }
}

fn failure_detail(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        let excerpt: String = trimmed.chars().take(DETAIL_BODY_LIMIT).collect();
        format!("HTTP {}: {}", status, excerpt)
    }
}
