//! Edge aggregation rules

use storage_health::health::EdgeStatusAggregator;
use storage_health::types::{Edge, EdgeHealth, ProbeErrorKind, ProbeOutcome};

#[test]
fn test_fresh_aggregator_reads_warn_everywhere() {
    let aggregator = EdgeStatusAggregator::new();
    for edge in Edge::ALL {
        assert_eq!(aggregator.current(edge), EdgeHealth::Warn);
        assert!(!aggregator.is_known(edge));
    }
    assert_eq!(aggregator.overall(), EdgeHealth::Warn);
}

#[test]
fn test_generic_outcome_mapping() {
    let ok = ProbeOutcome::success("p", Some(200), 1, "HTTP 200");
    let client_error =
        ProbeOutcome::failure("p", Some(404), ProbeErrorKind::ClientError, 1, "HTTP 404");
    let server_error =
        ProbeOutcome::failure("p", Some(503), ProbeErrorKind::ServerError, 1, "HTTP 503");
    let network = ProbeOutcome::network_error("p", 1, "refused");

    assert_eq!(EdgeStatusAggregator::health_for_outcome(&ok), EdgeHealth::Ok);
    assert_eq!(
        EdgeStatusAggregator::health_for_outcome(&client_error),
        EdgeHealth::Warn
    );
    assert_eq!(
        EdgeStatusAggregator::health_for_outcome(&server_error),
        EdgeHealth::Down
    );
    assert_eq!(
        EdgeStatusAggregator::health_for_outcome(&network),
        EdgeHealth::Down
    );
}

#[test]
fn test_update_touches_only_its_edge() {
    let mut aggregator = EdgeStatusAggregator::new();
    for edge in Edge::ALL {
        aggregator.force(edge, EdgeHealth::Ok);
    }

    let failed = ProbeOutcome::network_error("storage-reachability", 4, "refused");
    aggregator.update(Edge::ClientStorage, &failed);

    assert_eq!(aggregator.current(Edge::ClientStorage), EdgeHealth::Down);
    assert_eq!(aggregator.current(Edge::ClientBackend), EdgeHealth::Ok);
    assert_eq!(aggregator.current(Edge::BackendStorage), EdgeHealth::Ok);
    assert_eq!(aggregator.overall(), EdgeHealth::Down);
}
