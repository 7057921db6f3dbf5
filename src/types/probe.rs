//! Probe types
//!
//! A probe is a single outbound network check. Whatever happens on the wire,
//! it is reduced to a [`ProbeOutcome`] at the client boundary so the
//! orchestrator only ever deals in plain data.

use serde::{Deserialize, Serialize};

/// Normalised failure class of a probe attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProbeErrorKind {
    #[default]
    None,
    /// No response at all: connection refused, DNS failure or timeout
    Network,
    /// 4xx, usually a permission or precondition problem
    ClientError,
    /// 5xx
    ServerError,
    /// Backing store's schema view is stale (settings write path only)
    SchemaCacheTransient,
    /// 2xx whose body failed the structural check
    MalformedResponse,
    /// Response outside the probe's accepted set; always DOWN
    Rejected,
}

impl ProbeErrorKind {
    /// Generic HTTP status classification used by smoke tests and the backend health call
    pub fn from_status(status: u16) -> Self {
        match status {
            200..=299 => ProbeErrorKind::None,
            400..=499 => ProbeErrorKind::ClientError,
            500..=599 => ProbeErrorKind::ServerError,
            _ => ProbeErrorKind::Rejected,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProbeErrorKind::None => "none",
            ProbeErrorKind::Network => "network error",
            ProbeErrorKind::ClientError => "client error",
            ProbeErrorKind::ServerError => "server error",
            ProbeErrorKind::SchemaCacheTransient => "schema cache transient",
            ProbeErrorKind::MalformedResponse => "malformed response",
            ProbeErrorKind::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Result of one probe attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub name: String,
    pub http_status: Option<u16>,
    pub ok: bool,
    pub error_kind: ProbeErrorKind,
    pub latency_ms: u64,
    pub detail: String,
}

impl ProbeOutcome {
    pub fn success(
        name: impl Into<String>,
        http_status: Option<u16>,
        latency_ms: u64,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            http_status,
            ok: true,
            error_kind: ProbeErrorKind::None,
            latency_ms,
            detail: detail.into(),
        }
    }

    pub fn failure(
        name: impl Into<String>,
        http_status: Option<u16>,
        error_kind: ProbeErrorKind,
        latency_ms: u64,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            http_status,
            ok: false,
            error_kind,
            latency_ms,
            detail: detail.into(),
        }
    }

    /// Transport-level failure (no status code)
    pub fn network_error(
        name: impl Into<String>,
        latency_ms: u64,
        detail: impl Into<String>,
    ) -> Self {
        Self::failure(name, None, ProbeErrorKind::Network, latency_ms, detail)
    }

    /// Re-label a 2xx outcome whose body did not pass validation
    pub fn into_malformed(self, detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_kind: ProbeErrorKind::MalformedResponse,
            detail: detail.into(),
            ..self
        }
    }

    /// Status code for log lines, `-` when the probe never got a response
    pub fn status_label(&self) -> String {
        self.http_status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}

/// Which contract a probe is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeKind {
    /// Direct HEAD against the bucket (client↔storage)
    Reachability,
    /// Backend self-report of its own and its storage connectivity
    BackendHealth,
    /// End-to-end synthetic upload through the backend
    Upload,
    /// One entry of the backend function smoke-test catalog
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Delete,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Head => write!(f, "HEAD"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Delete => write!(f, "DELETE"),
        }
    }
}

/// Request body of a probe
#[derive(Debug, Clone, PartialEq)]
pub enum ProbePayload {
    Empty,
    Json(serde_json::Value),
    /// Query-string parameters (GET-style functions)
    Query(Vec<(String, String)>),
    Multipart {
        file_name: String,
        content: Vec<u8>,
        folder: String,
    },
}

/// A fully resolved probe request
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSpec {
    pub name: String,
    pub kind: ProbeKind,
    pub method: HttpMethod,
    pub url: String,
    pub payload: ProbePayload,
}

/// Normalised outcome plus the parsed JSON body, when there was one
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResponse {
    pub outcome: ProbeOutcome,
    pub body: Option<serde_json::Value>,
}

impl ProbeResponse {
    pub fn new(outcome: ProbeOutcome, body: Option<serde_json::Value>) -> Self {
        Self { outcome, body }
    }

    pub fn without_body(outcome: ProbeOutcome) -> Self {
        Self {
            outcome,
            body: None,
        }
    }
}
