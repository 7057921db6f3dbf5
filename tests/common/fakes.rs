//! Fake collaborators: scripted probe client, gated probe client, flaky store

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storage_health::errors::{AppResult, StoreError, StoreResult};
use storage_health::probe::{classify_status, ProbeClient};
use storage_health::store::{ConfigStore, ObjectLister};
use storage_health::types::{
    ObjectRecord, ProbeErrorKind, ProbeOutcome, ProbeResponse, ProbeSpec, StorageSettings,
};
use tokio::sync::Notify;

/// How a scripted probe answers
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, Option<Value>),
    NetworkError,
    /// Never answers; the orchestrator's timeout has to cut it off
    Hang,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Reply::Status(200, Some(body))
    }

    pub fn status(status: u16) -> Self {
        Reply::Status(status, None)
    }
}

/// Build the response a real client would produce for `reply`
pub fn respond(spec: &ProbeSpec, reply: &Reply) -> ProbeResponse {
    match reply {
        Reply::Status(status, body) => {
            let kind = classify_status(spec.kind, *status);
            let detail = format!("HTTP {}", status);
            let outcome = if kind == ProbeErrorKind::None {
                ProbeOutcome::success(&spec.name, Some(*status), 3, detail)
            } else {
                ProbeOutcome::failure(&spec.name, Some(*status), kind, 3, detail)
            };
            ProbeResponse::new(outcome, body.clone())
        }
        Reply::NetworkError | Reply::Hang => ProbeResponse::without_body(
            ProbeOutcome::network_error(&spec.name, 3, "connection refused"),
        ),
    }
}

/// Answers by probe name; unscripted probes get a network error
#[derive(Default)]
pub struct ScriptedProbeClient {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<ProbeSpec>>,
}

impl ScriptedProbeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, reply: Reply) -> Self {
        self.replies.insert(name.to_string(), reply);
        self
    }

    /// Specs received so far, in call order
    pub fn calls(&self) -> Vec<ProbeSpec> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|spec| spec.name).collect()
    }
}

impl ProbeClient for ScriptedProbeClient {
    fn probe<'a>(&'a self, spec: &'a ProbeSpec) -> BoxFuture<'a, ProbeResponse> {
        self.calls.lock().unwrap().push(spec.clone());
        let reply = self
            .replies
            .get(&spec.name)
            .cloned()
            .unwrap_or(Reply::NetworkError);

        match reply {
            Reply::Hang => future::pending().boxed(),
            reply => future::ready(respond(spec, &reply)).boxed(),
        }
    }
}

/// Holds every probe until released, to keep a run in flight
pub struct GatedProbeClient {
    inner: ScriptedProbeClient,
    gate: Arc<Notify>,
    entered: Arc<Notify>,
}

impl GatedProbeClient {
    pub fn new(inner: ScriptedProbeClient) -> Self {
        Self {
            inner,
            gate: Arc::new(Notify::new()),
            entered: Arc::new(Notify::new()),
        }
    }

    /// Notified when the first probe reaches the gate
    pub fn entered(&self) -> Arc<Notify> {
        Arc::clone(&self.entered)
    }

    /// Opens the gate for all current and future probes
    pub fn gate(&self) -> Arc<Notify> {
        Arc::clone(&self.gate)
    }
}

impl ProbeClient for GatedProbeClient {
    fn probe<'a>(&'a self, spec: &'a ProbeSpec) -> BoxFuture<'a, ProbeResponse> {
        async move {
            self.entered.notify_one();
            self.gate.notified().await;
            // Keep the gate open for the next probe of the same run
            self.gate.notify_one();
            self.inner.probe(spec).await
        }
        .boxed()
    }
}

/// Holds one named probe until released; every other probe answers at once
pub struct ParkedProbeClient {
    inner: ScriptedProbeClient,
    parked: String,
    reached: Arc<Notify>,
    release: Arc<Notify>,
}

impl ParkedProbeClient {
    pub fn new(inner: ScriptedProbeClient, parked: &str) -> Self {
        Self {
            inner,
            parked: parked.to_string(),
            reached: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    /// Notified when the parked probe is entered
    pub fn reached(&self) -> Arc<Notify> {
        Arc::clone(&self.reached)
    }

    /// Lets the parked probe continue
    pub fn release(&self) -> Arc<Notify> {
        Arc::clone(&self.release)
    }
}

impl ProbeClient for ParkedProbeClient {
    fn probe<'a>(&'a self, spec: &'a ProbeSpec) -> BoxFuture<'a, ProbeResponse> {
        async move {
            if spec.name == self.parked {
                self.reached.notify_one();
                self.release.notified().await;
            }
            self.inner.probe(spec).await
        }
        .boxed()
    }
}

/// Settings store that fails `set` with a schema-cache transient a fixed number of times
pub struct FlakyConfigStore {
    transient_failures: usize,
    set_calls: AtomicUsize,
    saved: Mutex<Option<StorageSettings>>,
    failure: Option<StoreError>,
}

impl FlakyConfigStore {
    pub fn failing_transiently(times: usize) -> Self {
        Self {
            transient_failures: times,
            set_calls: AtomicUsize::new(0),
            saved: Mutex::new(None),
            failure: None,
        }
    }

    /// Every `set` fails with `error`
    pub fn failing_with(error: StoreError) -> Self {
        Self {
            transient_failures: 0,
            set_calls: AtomicUsize::new(0),
            saved: Mutex::new(None),
            failure: Some(error),
        }
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn saved(&self) -> Option<StorageSettings> {
        self.saved.lock().unwrap().clone()
    }
}

impl ConfigStore for FlakyConfigStore {
    fn get(&self) -> BoxFuture<'_, StoreResult<StorageSettings>> {
        let result = self.saved().ok_or(StoreError::NotFound);
        future::ready(result).boxed()
    }

    fn set<'a>(&'a self, settings: &'a StorageSettings) -> BoxFuture<'a, StoreResult<()>> {
        let call = self.set_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let result = if let Some(error) = &self.failure {
            Err(error.clone())
        } else if call <= self.transient_failures {
            Err(StoreError::SchemaCacheTransient(format!(
                "Could not find the 'max_upload_mb' column in the schema cache (call {})",
                call
            )))
        } else {
            *self.saved.lock().unwrap() = Some(settings.clone());
            Ok(())
        };
        future::ready(result).boxed()
    }
}

/// Lister over a fixed record set that can be held open to simulate a slow listing
pub struct SlowLister {
    records: Vec<ObjectRecord>,
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowLister {
    pub fn new(records: Vec<ObjectRecord>, delay: Duration) -> Self {
        Self {
            records,
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ObjectLister for SlowLister {
    fn list_objects(&self) -> BoxFuture<'_, AppResult<Vec<ObjectRecord>>> {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(self.records.clone())
        }
        .boxed()
    }
}
