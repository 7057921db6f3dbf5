//! Periodic analytics refresh
//!
//! Runs on a fixed interval in a background task. Each tick asks the injected
//! `should_run` predicate first and is skipped when the host is inactive. A
//! refresh that is still in flight makes any other refresh (tick or on-demand)
//! a no-op rather than a second concurrent listing.

use crate::analysis::aggregator::AnalyticsAggregator;
use crate::errors::AppResult;
use crate::store::ObjectLister;
use crate::types::AnalyticsSnapshot;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Shortest accepted refresh interval
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// "Should I run now" predicate consulted before every scheduled tick
pub type ShouldRun = Arc<dyn Fn() -> bool + Send + Sync>;

/// What a refresh attempt did
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Refreshed(AnalyticsSnapshot),
    /// Another refresh was still in progress
    Overlapping,
    /// The host was not active
    Inactive,
}

/// State shared between the handle and its background task
struct RefreshState {
    lister: Arc<dyn ObjectLister>,
    aggregator: AnalyticsAggregator,
    latest: watch::Sender<Option<AnalyticsSnapshot>>,
    in_progress: AtomicBool,
    completed: AtomicU64,
}

/// Clears the in-progress flag however the refresh ends
struct InProgressGuard<'a>(&'a AtomicBool);

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RefreshState {
    async fn refresh(&self) -> AppResult<RefreshOutcome> {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Analytics refresh already in progress, skipping");
            return Ok(RefreshOutcome::Overlapping);
        }
        let _guard = InProgressGuard(&self.in_progress);

        let records = self.lister.list_objects().await?;
        let snapshot = self.aggregator.aggregate(&records);

        self.latest.send_replace(Some(snapshot.clone()));
        self.completed.fetch_add(1, Ordering::Relaxed);
        debug!(
            objects = snapshot.total_objects,
            bytes = snapshot.total_bytes,
            "Analytics snapshot refreshed"
        );

        Ok(RefreshOutcome::Refreshed(snapshot))
    }

    async fn scheduled(
        &self,
        should_run: &(dyn Fn() -> bool + Send + Sync),
    ) -> AppResult<RefreshOutcome> {
        if !should_run() {
            debug!("Host inactive, skipping analytics tick");
            return Ok(RefreshOutcome::Inactive);
        }
        self.refresh().await
    }
}

/// Recurring analytics refresh with start/stop lifecycle
pub struct AnalyticsRefresher {
    state: Arc<RefreshState>,
    interval: Duration,
    should_run: ShouldRun,
    task_handle: Option<JoinHandle<()>>,
}

impl AnalyticsRefresher {
    /// Create a stopped refresher that always considers the host active
    pub fn new(
        lister: Arc<dyn ObjectLister>,
        aggregator: AnalyticsAggregator,
        interval: Duration,
    ) -> Self {
        if interval < MIN_REFRESH_INTERVAL {
            warn!(
                "Refresh interval {:?} is below the minimum, using {:?}",
                interval, MIN_REFRESH_INTERVAL
            );
        }

        let (latest, _) = watch::channel(None);
        Self {
            state: Arc::new(RefreshState {
                lister,
                aggregator,
                latest,
                in_progress: AtomicBool::new(false),
                completed: AtomicU64::new(0),
            }),
            interval: interval.max(MIN_REFRESH_INTERVAL),
            should_run: Arc::new(|| true),
            task_handle: None,
        }
    }

    /// Replace the activity predicate; takes effect on the next `start`
    pub fn with_should_run(
        mut self,
        should_run: impl Fn() -> bool + Send + Sync + 'static,
    ) -> Self {
        self.should_run = Arc::new(should_run);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the background task; the first tick fires immediately
    pub fn start(&mut self) {
        if self.is_running() {
            debug!("Analytics refresher already running");
            return;
        }

        info!(
            interval_secs = self.interval.as_secs(),
            "Starting analytics refresher"
        );

        let state = Arc::clone(&self.state);
        let should_run = Arc::clone(&self.should_run);
        let period = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                match state.scheduled(should_run.as_ref()).await {
                    Ok(RefreshOutcome::Refreshed(_)) => {}
                    Ok(outcome) => debug!(?outcome, "Analytics tick did not refresh"),
                    Err(e) => error!(error = %e, "Analytics refresh failed"),
                }
            }
        });

        self.task_handle = Some(handle);
    }

    /// Abort the background task; the latest snapshot stays readable
    pub fn stop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            info!("Stopping analytics refresher");
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Run one scheduled tick by hand: the activity predicate applies
    pub async fn tick(&self) -> AppResult<RefreshOutcome> {
        self.state.scheduled(self.should_run.as_ref()).await
    }

    /// Refresh once on demand, ignoring the activity predicate
    pub async fn refresh_now(&self) -> AppResult<RefreshOutcome> {
        self.state.refresh().await
    }

    /// Latest snapshot, if any refresh has completed
    pub fn latest(&self) -> Option<AnalyticsSnapshot> {
        self.state.latest.borrow().clone()
    }

    /// Receiver notified whenever a new snapshot lands
    pub fn subscribe(&self) -> watch::Receiver<Option<AnalyticsSnapshot>> {
        self.state.latest.subscribe()
    }

    pub fn is_refreshing(&self) -> bool {
        self.state.in_progress.load(Ordering::Acquire)
    }

    /// Refreshes completed since creation
    pub fn completed_refreshes(&self) -> u64 {
        self.state.completed.load(Ordering::Relaxed)
    }
}

impl Drop for AnalyticsRefresher {
    fn drop(&mut self) {
        self.stop();
    }
}
