use crate::errors::OrchestratorError;
use crate::health::aggregator::EdgeStatusAggregator;
use crate::health::events::{LogEntry, LogLevel, EVENT_CHANNEL_CAPACITY};
use crate::probe::catalog::SYNTHETIC_OBJECT_KEY;
use crate::probe::{execute_with_timeout, FunctionSpec, ProbeClient, ProbeTargets};
use crate::types::{Edge, EdgeHealth, ProbeOutcome, ProbeResponse, ProbeSpec};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Result of one topology health run
#[derive(Debug, Clone, Serialize)]
pub struct TopologyReport {
    pub edges: BTreeMap<Edge, EdgeHealth>,
    pub overall: EdgeHealth,
    pub log: Vec<String>,
    pub outcomes: Vec<ProbeOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Status of one catalog function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionStatus {
    pub name: String,
    pub status: EdgeHealth,
}

/// Result of one function smoke-test run; results and outcomes are in catalog order
#[derive(Debug, Clone, Serialize)]
pub struct SmokeTestReport {
    pub results: Vec<FunctionStatus>,
    pub outcomes: Vec<ProbeOutcome>,
    pub log: Vec<String>,
}

impl SmokeTestReport {
    pub fn status(&self, name: &str) -> Option<EdgeHealth> {
        self.results
            .iter()
            .find(|result| result.name == name)
            .map(|result| result.status)
    }

    /// Worst status across all functions
    pub fn worst(&self) -> EdgeHealth {
        worst_status(&self.results)
    }
}

fn worst_status(results: &[FunctionStatus]) -> EdgeHealth {
    results
        .iter()
        .map(|result| result.status)
        .fold(EdgeHealth::Ok, EdgeHealth::worst)
}

/// Backend self-report after interpretation
#[derive(Debug, Clone, PartialEq)]
pub struct BackendHealthReading {
    pub outcome: ProbeOutcome,
    pub client_backend: EdgeHealth,
    pub backend_storage: EdgeHealth,
}

/// Upload probe after interpretation
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReading {
    pub outcome: ProbeOutcome,
    pub object_key: Option<String>,
}

/// Interpret the backend health response `{ backendOnline, backendToStorageOnline }`
///
/// Each flag maps to OK or WARN for its own edge. A failed call applies the
/// generic mapping to both edges; a 2xx with a malformed body marks both DOWN.
pub fn interpret_backend_health(response: ProbeResponse) -> BackendHealthReading {
    let ProbeResponse { outcome, body } = response;

    if !outcome.ok {
        let health = EdgeStatusAggregator::health_for_outcome(&outcome);
        return BackendHealthReading {
            outcome,
            client_backend: health,
            backend_storage: health,
        };
    }

    let flags = body.as_ref().and_then(|body| {
        let backend = body.get("backendOnline")?.as_bool()?;
        let storage = body.get("backendToStorageOnline")?.as_bool()?;
        Some((backend, storage))
    });

    match flags {
        Some((backend_online, storage_online)) => {
            let flag_health = |online: bool| {
                if online {
                    EdgeHealth::Ok
                } else {
                    EdgeHealth::Warn
                }
            };
            let detail = format!(
                "{} (backend online: {}, backend to storage online: {})",
                outcome.detail, backend_online, storage_online
            );
            BackendHealthReading {
                outcome: ProbeOutcome { detail, ..outcome },
                client_backend: flag_health(backend_online),
                backend_storage: flag_health(storage_online),
            }
        }
        None => {
            let detail = format!(
                "HTTP {} without backendOnline/backendToStorageOnline flags",
                outcome.status_label()
            );
            BackendHealthReading {
                outcome: outcome.into_malformed(detail),
                client_backend: EdgeHealth::Down,
                backend_storage: EdgeHealth::Down,
            }
        }
    }
}

/// Interpret the upload response `{ success, key }`
pub fn interpret_upload(response: ProbeResponse) -> UploadReading {
    let ProbeResponse { outcome, body } = response;

    if !outcome.ok {
        return UploadReading {
            outcome,
            object_key: None,
        };
    }

    let key = body.as_ref().and_then(|body| {
        let success = body.get("success")?.as_bool()?;
        let key = body.get("key")?.as_str()?;
        (success && !key.is_empty()).then(|| key.to_string())
    });

    match key {
        Some(key) => UploadReading {
            outcome: ProbeOutcome {
                detail: format!("{} (stored as {})", outcome.detail, key),
                ..outcome
            },
            object_key: Some(key),
        },
        None => {
            let detail = format!(
                "HTTP {} without success flag and object key",
                outcome.status_label()
            );
            UploadReading {
                outcome: outcome.into_malformed(detail),
                object_key: None,
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Releases the busy flag when a run ends, however it ends
struct BusyGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Sequences topology probes and function smoke tests
///
/// Owns the edge state, the busy flag and the last run's results. Probe
/// failures never escape: they are recorded as outcomes and log lines.
pub struct ProbeOrchestrator {
    client: Arc<dyn ProbeClient>,
    targets: ProbeTargets,
    probe_timeout: Duration,
    aggregator: Mutex<EdgeStatusAggregator>,
    busy: AtomicBool,
    last_object_key: Mutex<Option<String>>,
    log: Mutex<Vec<LogEntry>>,
    last_report: Mutex<Option<TopologyReport>>,
    events: broadcast::Sender<LogEntry>,
}

impl ProbeOrchestrator {
    pub fn new(
        client: Arc<dyn ProbeClient>,
        targets: ProbeTargets,
        probe_timeout: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            client,
            targets,
            probe_timeout,
            aggregator: Mutex::new(EdgeStatusAggregator::new()),
            busy: AtomicBool::new(false),
            last_object_key: Mutex::new(None),
            log: Mutex::new(Vec::new()),
            last_report: Mutex::new(None),
            events,
        }
    }

    /// Follow log lines as they are produced
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.events.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn edges(&self) -> BTreeMap<Edge, EdgeHealth> {
        lock(&self.aggregator).snapshot()
    }

    pub fn overall(&self) -> EdgeHealth {
        lock(&self.aggregator).overall()
    }

    /// Lines of the current (or most recent) run so far
    pub fn log_lines(&self) -> Vec<String> {
        lock(&self.log).iter().map(LogEntry::line).collect()
    }

    /// Key returned by the most recent successful upload
    pub fn last_object_key(&self) -> Option<String> {
        lock(&self.last_object_key).clone()
    }

    pub fn last_report(&self) -> Option<TopologyReport> {
        lock(&self.last_report).clone()
    }

    /// Run the reachability, backend-health and upload probes in that order
    ///
    /// Rejected with [`OrchestratorError::Busy`] while another run is in flight.
    pub async fn run_topology_check(&self) -> Result<TopologyReport, OrchestratorError> {
        let _guard = self.try_begin()?;
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(3);

        self.reset_log();
        self.emit(
            LogLevel::Info,
            format!("Starting topology check against {}", self.targets.storage_url),
        );

        // client↔storage
        let response = self.run_probe(&self.targets.reachability_spec()).await;
        let health = lock(&self.aggregator).update(Edge::ClientStorage, &response.outcome);
        self.log_edge_outcome(Edge::ClientStorage, &response.outcome, health);
        outcomes.push(response.outcome);

        // client↔backend and backend↔storage, as reported by the backend itself
        let response = self.run_probe(&self.targets.backend_health_spec()).await;
        let reading = interpret_backend_health(response);
        {
            let mut aggregator = lock(&self.aggregator);
            aggregator.force(Edge::ClientBackend, reading.client_backend);
            aggregator.force(Edge::BackendStorage, reading.backend_storage);
        }
        self.log_edge_outcome(Edge::ClientBackend, &reading.outcome, reading.client_backend);
        self.log_edge_outcome(Edge::BackendStorage, &reading.outcome, reading.backend_storage);
        outcomes.push(reading.outcome);

        // An accepted upload is direct evidence for backend↔storage
        let response = self.run_probe(&self.targets.upload_spec()).await;
        let reading = interpret_upload(response);
        let health = if reading.outcome.ok {
            EdgeHealth::Ok
        } else {
            EdgeHealth::Down
        };
        lock(&self.aggregator).force(Edge::BackendStorage, health);
        if let Some(key) = &reading.object_key {
            *lock(&self.last_object_key) = Some(key.clone());
        }
        self.log_edge_outcome(Edge::BackendStorage, &reading.outcome, health);
        outcomes.push(reading.outcome);

        let (edges, overall) = {
            let aggregator = lock(&self.aggregator);
            (aggregator.snapshot(), aggregator.overall())
        };
        self.emit(
            LogLevel::from(overall),
            format!("Topology check finished: overall {}", overall),
        );
        info!("Topology check finished with overall status {}", overall);

        let report = TopologyReport {
            edges,
            overall,
            log: self.log_lines(),
            outcomes,
            started_at,
            finished_at: Utc::now(),
        };
        *lock(&self.last_report) = Some(report.clone());

        Ok(report)
    }

    /// Invoke every catalog function once, in order, never stopping early
    ///
    /// 2xx is OK, 4xx WARN (most likely an auth precondition), 5xx or no response DOWN.
    pub async fn run_function_smoke_tests(
        &self,
        catalog: &[FunctionSpec],
    ) -> Result<SmokeTestReport, OrchestratorError> {
        let _guard = self.try_begin()?;
        let mut results = Vec::with_capacity(catalog.len());
        let mut outcomes = Vec::with_capacity(catalog.len());

        self.reset_log();
        self.emit(
            LogLevel::Info,
            format!("Starting smoke tests for {} functions", catalog.len()),
        );

        for function in catalog {
            let object_key = if function.needs_object_key() {
                self.last_object_key()
                    .unwrap_or_else(|| SYNTHETIC_OBJECT_KEY.to_string())
            } else {
                SYNTHETIC_OBJECT_KEY.to_string()
            };

            let spec = function.resolve(&self.targets, &object_key);
            let response = self.run_probe(&spec).await;
            let status = EdgeHealth::from_http_status(response.outcome.http_status);

            // A successful upload smoke test gives later lookups a real key
            if status == EdgeHealth::Ok {
                if let Some(key) = response
                    .body
                    .as_ref()
                    .and_then(|body| body.get("key"))
                    .and_then(|key| key.as_str())
                    .filter(|key| !key.is_empty())
                {
                    *lock(&self.last_object_key) = Some(key.to_string());
                }
            }

            self.emit(
                LogLevel::from(status),
                format!(
                    "{}: {} (HTTP {}, {}ms)",
                    function.name,
                    response.outcome.detail,
                    response.outcome.status_label(),
                    response.outcome.latency_ms
                ),
            );
            results.push(FunctionStatus {
                name: function.name.clone(),
                status,
            });
            outcomes.push(response.outcome);
        }

        let worst = worst_status(&results);
        self.emit(
            LogLevel::from(worst),
            format!("Smoke tests finished: worst status {}", worst),
        );

        Ok(SmokeTestReport {
            results,
            outcomes,
            log: self.log_lines(),
        })
    }

    fn try_begin(&self) -> Result<BusyGuard<'_>, OrchestratorError> {
        match self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Ok(BusyGuard { busy: &self.busy }),
            Err(_) => {
                warn!("Rejected probe run: another run is in flight");
                Err(OrchestratorError::Busy)
            }
        }
    }

    async fn run_probe(&self, spec: &ProbeSpec) -> ProbeResponse {
        debug!("Running probe {}", spec.name);
        match execute_with_timeout(self.probe_timeout, self.client.probe(spec)).await {
            Ok(response) => response,
            Err(_) => ProbeResponse::without_body(ProbeOutcome::network_error(
                &spec.name,
                self.probe_timeout.as_millis() as u64,
                format!("timed out after {:?}", self.probe_timeout),
            )),
        }
    }

    fn reset_log(&self) {
        lock(&self.log).clear();
    }

    fn emit(&self, level: LogLevel, message: String) {
        let entry = LogEntry::new(level, message);
        lock(&self.log).push(entry.clone());
        // No subscribers is fine; the collected log is still the source of truth
        let _ = self.events.send(entry);
    }

    fn log_edge_outcome(&self, edge: Edge, outcome: &ProbeOutcome, health: EdgeHealth) {
        let message = if outcome.ok {
            format!(
                "{} [{}]: {} ({}ms)",
                outcome.name, edge, outcome.detail, outcome.latency_ms
            )
        } else {
            format!(
                "{} [{}]: {}: {} (HTTP {}, {}ms)",
                outcome.name,
                edge,
                outcome.error_kind,
                outcome.detail,
                outcome.status_label(),
                outcome.latency_ms
            )
        };
        self.emit(LogLevel::from(health), message);
    }
}
