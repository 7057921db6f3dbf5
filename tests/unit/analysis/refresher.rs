//! Refresh scheduling: overlap suppression, inactive host, background ticks

use crate::common::fakes::SlowLister;
use crate::common::records::{record, MB};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storage_health::analysis::{AnalyticsAggregator, AnalyticsRefresher, RefreshOutcome};

fn refresher_over(lister: Arc<SlowLister>, interval: Duration) -> AnalyticsRefresher {
    AnalyticsRefresher::new(lister, AnalyticsAggregator::default(), interval)
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_refresh_is_a_noop() {
    let lister = Arc::new(SlowLister::new(
        vec![record(MB, "image/png", "a.png")],
        Duration::from_secs(5),
    ));
    let refresher = refresher_over(Arc::clone(&lister), Duration::from_secs(30));

    let (first, second) = tokio::join!(refresher.refresh_now(), async {
        // Let the first refresh reach the listing before the second one starts
        tokio::task::yield_now().await;
        refresher.refresh_now().await
    });

    assert!(matches!(first.unwrap(), RefreshOutcome::Refreshed(_)));
    assert_eq!(second.unwrap(), RefreshOutcome::Overlapping);
    assert_eq!(lister.calls(), 1);
    assert_eq!(refresher.completed_refreshes(), 1);
    assert!(!refresher.is_refreshing());
}

#[tokio::test]
async fn test_inactive_host_skips_scheduled_tick() {
    let lister = Arc::new(SlowLister::new(Vec::new(), Duration::ZERO));
    let active = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&active);
    let refresher = refresher_over(Arc::clone(&lister), Duration::from_secs(30))
        .with_should_run(move || flag.load(Ordering::SeqCst));

    assert_eq!(refresher.tick().await.unwrap(), RefreshOutcome::Inactive);
    assert_eq!(lister.calls(), 0);
    assert!(refresher.latest().is_none());

    // An on-demand refresh ignores the activity predicate
    assert!(matches!(
        refresher.refresh_now().await.unwrap(),
        RefreshOutcome::Refreshed(_)
    ));

    active.store(true, Ordering::SeqCst);
    assert!(matches!(
        refresher.tick().await.unwrap(),
        RefreshOutcome::Refreshed(_)
    ));
    assert_eq!(lister.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_background_task_refreshes_on_interval() {
    let lister = Arc::new(SlowLister::new(
        vec![record(2 * MB, "video/mp4", "clip.mp4")],
        Duration::ZERO,
    ));
    let mut refresher = refresher_over(Arc::clone(&lister), Duration::from_secs(30));
    let mut updates = refresher.subscribe();

    refresher.start();
    updates.changed().await.unwrap();
    let snapshot = updates.borrow_and_update().clone().unwrap();
    assert_eq!(snapshot.total_objects, 1);
    assert_eq!(snapshot.total_bytes, 2 * MB);

    // Second tick after one interval
    updates.changed().await.unwrap();
    assert!(lister.calls() >= 2);

    refresher.stop();
    assert!(!refresher.is_running());
    assert!(refresher.latest().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_paused_host_keeps_previous_snapshot() {
    let lister = Arc::new(SlowLister::new(Vec::new(), Duration::ZERO));
    let mut refresher =
        refresher_over(Arc::clone(&lister), Duration::from_secs(10)).with_should_run(|| false);

    refresher.start();
    tokio::time::sleep(Duration::from_secs(35)).await;

    assert_eq!(lister.calls(), 0);
    assert!(refresher.latest().is_none());
    refresher.stop();
}
