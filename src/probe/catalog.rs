//! Backend function smoke-test catalog
//!
//! Each entry names one backend function and the smallest payload that
//! satisfies its contract. Lookup-style functions take an object key; the
//! orchestrator passes the key from the last successful upload probe and falls
//! back to [`SYNTHETIC_OBJECT_KEY`] when none has been observed yet.

use crate::probe::targets::{synthetic_upload_payload, ProbeTargets};
use crate::types::{HttpMethod, ProbeKind, ProbePayload, ProbeSpec};
use serde_json::{json, Value};

/// Key that never refers to a real object
pub const SYNTHETIC_OBJECT_KEY: &str = "health-checks/non-production/probe-missing-object.txt";

/// Payload shape of a catalog function
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionPayload {
    /// No body
    Empty,
    /// Fixed JSON body
    Json(Value),
    /// JSON object merged with `{"key": <object key>}`
    ObjectKey(Value),
    /// `?key=<object key>` query string
    ObjectKeyQuery,
    /// Small synthetic multipart upload
    SyntheticUpload,
}

/// One entry of the smoke-test catalog
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSpec {
    pub name: String,
    pub slug: String,
    pub method: HttpMethod,
    pub payload: FunctionPayload,
}

impl FunctionSpec {
    pub fn new(name: &str, slug: &str, method: HttpMethod, payload: FunctionPayload) -> Self {
        Self {
            name: name.to_string(),
            slug: slug.to_string(),
            method,
            payload,
        }
    }

    /// Whether this function is exercised against an existing object
    pub fn needs_object_key(&self) -> bool {
        matches!(
            self.payload,
            FunctionPayload::ObjectKey(_) | FunctionPayload::ObjectKeyQuery
        )
    }

    /// Build the concrete probe for this function
    pub fn resolve(&self, targets: &ProbeTargets, object_key: &str) -> ProbeSpec {
        let payload = match &self.payload {
            FunctionPayload::Empty => ProbePayload::Empty,
            FunctionPayload::Json(body) => ProbePayload::Json(body.clone()),
            FunctionPayload::ObjectKey(extra) => {
                let mut body = match extra {
                    Value::Object(map) => map.clone(),
                    _ => serde_json::Map::new(),
                };
                body.insert("key".to_string(), Value::String(object_key.to_string()));
                ProbePayload::Json(Value::Object(body))
            }
            FunctionPayload::ObjectKeyQuery => {
                ProbePayload::Query(vec![("key".to_string(), object_key.to_string())])
            }
            FunctionPayload::SyntheticUpload => synthetic_upload_payload(),
        };

        ProbeSpec {
            name: self.name.clone(),
            kind: ProbeKind::Function,
            method: self.method,
            url: targets.function_url(&self.slug),
            payload,
        }
    }
}

/// The fixed catalog exercised by the smoke-test suite, in run order
pub fn default_function_catalog() -> Vec<FunctionSpec> {
    vec![
        // Deleting must never touch a real object, so it always gets the synthetic key
        FunctionSpec::new(
            "delete",
            "wasabi-delete",
            HttpMethod::Post,
            FunctionPayload::Json(json!({ "key": SYNTHETIC_OBJECT_KEY })),
        ),
        FunctionSpec::new(
            "download",
            "wasabi-download",
            HttpMethod::Post,
            FunctionPayload::ObjectKey(json!({})),
        ),
        FunctionSpec::new(
            "list",
            "wasabi-list",
            HttpMethod::Post,
            FunctionPayload::Json(json!({ "prefix": "health-checks/", "maxKeys": 1 })),
        ),
        FunctionSpec::new(
            "metadata",
            "wasabi-metadata",
            HttpMethod::Post,
            FunctionPayload::ObjectKey(json!({})),
        ),
        FunctionSpec::new(
            "security",
            "wasabi-security",
            HttpMethod::Post,
            FunctionPayload::ObjectKey(json!({ "action": "check" })),
        ),
        FunctionSpec::new(
            "upload",
            "wasabi-upload",
            HttpMethod::Post,
            FunctionPayload::SyntheticUpload,
        ),
        FunctionSpec::new(
            "get-url",
            "wasabi-get-url",
            HttpMethod::Post,
            FunctionPayload::ObjectKey(json!({ "expiresIn": 60 })),
        ),
        FunctionSpec::new(
            "proxy",
            "wasabi-proxy",
            HttpMethod::Get,
            FunctionPayload::ObjectKeyQuery,
        ),
        FunctionSpec::new(
            "connection-test",
            "wasabi-connection-test",
            HttpMethod::Post,
            FunctionPayload::Empty,
        ),
    ]
}
