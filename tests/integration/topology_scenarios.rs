//! Topology check scenarios over a scripted probe client

use crate::common::fakes::{GatedProbeClient, Reply, ScriptedProbeClient};
use crate::common::{default_targets, orchestrator_with, TEST_PROBE_TIMEOUT};
use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use storage_health::errors::OrchestratorError;
use storage_health::health::ProbeOrchestrator;
use storage_health::types::{Edge, EdgeHealth, ProbeErrorKind};

const UPLOADED_KEY: &str = "health-checks/non-production/1712000000-connectivity-probe.txt";

fn health_body(backend_online: bool, storage_online: bool) -> Reply {
    Reply::ok(json!({
        "backendOnline": backend_online,
        "backendToStorageOnline": storage_online,
    }))
}

fn upload_accepted() -> Reply {
    Reply::ok(json!({ "success": true, "key": UPLOADED_KEY }))
}

#[tokio::test]
async fn test_all_healthy() -> Result<()> {
    let client = ScriptedProbeClient::new()
        .with("storage-reachability", Reply::status(200))
        .with("backend-health", health_body(true, true))
        .with("upload-roundtrip", upload_accepted());
    let client = Arc::new(client);
    let orchestrator = orchestrator_with(client.clone());

    let report = orchestrator.run_topology_check().await?;

    assert_eq!(report.overall, EdgeHealth::Ok);
    for edge in Edge::ALL {
        assert_eq!(report.edges[&edge], EdgeHealth::Ok);
    }
    assert_eq!(
        client.call_names(),
        vec!["storage-reachability", "backend-health", "upload-roundtrip"]
    );
    assert_eq!(orchestrator.last_object_key().as_deref(), Some(UPLOADED_KEY));
    Ok(())
}

#[tokio::test]
async fn test_forbidden_bucket_counts_as_reachable() -> Result<()> {
    let client = ScriptedProbeClient::new()
        .with("storage-reachability", Reply::status(403))
        .with("backend-health", health_body(true, true))
        .with("upload-roundtrip", upload_accepted());
    let orchestrator = orchestrator_with(Arc::new(client));

    let report = orchestrator.run_topology_check().await?;

    assert!(report.outcomes[0].ok);
    assert_eq!(report.outcomes[0].http_status, Some(403));
    assert_eq!(report.edges[&Edge::ClientStorage], EdgeHealth::Ok);
    Ok(())
}

#[tokio::test]
async fn test_storage_unreachable_from_client_only() -> Result<()> {
    let client = ScriptedProbeClient::new()
        .with("storage-reachability", Reply::NetworkError)
        .with("backend-health", health_body(true, true))
        .with("upload-roundtrip", upload_accepted());
    let orchestrator = orchestrator_with(Arc::new(client));

    let report = orchestrator.run_topology_check().await?;

    assert_eq!(report.edges[&Edge::ClientStorage], EdgeHealth::Down);
    assert_eq!(report.edges[&Edge::ClientBackend], EdgeHealth::Ok);
    assert_eq!(report.edges[&Edge::BackendStorage], EdgeHealth::Ok);
    assert_eq!(report.overall, EdgeHealth::Down);
    assert!(report
        .log
        .iter()
        .any(|line| line.starts_with("[DOWN] storage-reachability")));
    Ok(())
}

#[tokio::test]
async fn test_upload_success_overrides_backend_warning() -> Result<()> {
    let client = ScriptedProbeClient::new()
        .with("storage-reachability", Reply::status(200))
        .with("backend-health", health_body(true, false))
        .with("upload-roundtrip", upload_accepted());
    let orchestrator = orchestrator_with(Arc::new(client));

    let report = orchestrator.run_topology_check().await?;

    // The health self-report logged WARN first, the upload then proved the edge
    assert!(report
        .log
        .iter()
        .any(|line| line.starts_with("[WARN] backend-health [")));
    assert_eq!(report.edges[&Edge::BackendStorage], EdgeHealth::Ok);
    assert_eq!(report.overall, EdgeHealth::Ok);
    Ok(())
}

#[tokio::test]
async fn test_rejected_upload_marks_backend_storage_down() -> Result<()> {
    let client = ScriptedProbeClient::new()
        .with("storage-reachability", Reply::status(200))
        .with("backend-health", health_body(true, true))
        .with("upload-roundtrip", Reply::status(403));
    let orchestrator = orchestrator_with(Arc::new(client));

    let report = orchestrator.run_topology_check().await?;

    let upload = &report.outcomes[2];
    assert_eq!(upload.error_kind, ProbeErrorKind::Rejected);
    assert_eq!(report.edges[&Edge::BackendStorage], EdgeHealth::Down);
    assert_eq!(report.edges[&Edge::ClientBackend], EdgeHealth::Ok);
    assert_eq!(orchestrator.last_object_key(), None);
    Ok(())
}

#[tokio::test]
async fn test_malformed_health_body_is_down_with_status_in_log() -> Result<()> {
    let client = ScriptedProbeClient::new()
        .with("storage-reachability", Reply::status(200))
        .with("backend-health", Reply::ok(json!({ "status": "fine" })))
        .with("upload-roundtrip", upload_accepted());
    let orchestrator = orchestrator_with(Arc::new(client));

    let report = orchestrator.run_topology_check().await?;

    assert_eq!(report.outcomes[1].error_kind, ProbeErrorKind::MalformedResponse);
    assert_eq!(report.edges[&Edge::ClientBackend], EdgeHealth::Down);
    assert!(report
        .log
        .iter()
        .any(|line| line.starts_with("[DOWN] backend-health") && line.contains("HTTP 200")));
    Ok(())
}

#[tokio::test]
async fn test_backend_auth_failure_is_warn_on_both_backend_edges() -> Result<()> {
    let client = ScriptedProbeClient::new()
        .with("storage-reachability", Reply::status(200))
        .with("backend-health", Reply::status(401))
        .with("upload-roundtrip", upload_accepted());
    let orchestrator = orchestrator_with(Arc::new(client));

    let report = orchestrator.run_topology_check().await?;

    assert_eq!(report.edges[&Edge::ClientBackend], EdgeHealth::Warn);
    assert_eq!(report.overall, EdgeHealth::Warn);
    Ok(())
}

#[tokio::test]
async fn test_overall_is_worst_edge_across_scenarios() -> Result<()> {
    let reachability = [Reply::status(200), Reply::status(404), Reply::NetworkError];
    let uploads = [upload_accepted(), Reply::status(500)];

    for reach in &reachability {
        for (backend_online, storage_online) in [(true, true), (false, true), (true, false)] {
            for upload in &uploads {
                let client = ScriptedProbeClient::new()
                    .with("storage-reachability", reach.clone())
                    .with("backend-health", health_body(backend_online, storage_online))
                    .with("upload-roundtrip", upload.clone());
                let orchestrator = orchestrator_with(Arc::new(client));

                let report = orchestrator.run_topology_check().await?;

                let worst = report.edges.values().copied().max().unwrap();
                assert_eq!(report.overall, worst);
                assert_eq!(orchestrator.overall(), worst);
            }
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_rejected_run_leaves_in_flight_result_intact() -> Result<()> {
    let scripted = ScriptedProbeClient::new()
        .with("storage-reachability", Reply::NetworkError)
        .with("backend-health", health_body(true, true))
        .with("upload-roundtrip", upload_accepted());
    let client = Arc::new(GatedProbeClient::new(scripted));
    let entered = client.entered();
    let gate = client.gate();
    let orchestrator = ProbeOrchestrator::new(client, default_targets(), TEST_PROBE_TIMEOUT);

    let (first, second) = tokio::join!(orchestrator.run_topology_check(), async {
        entered.notified().await;
        let second = orchestrator.run_topology_check().await;
        gate.notify_one();
        second
    });

    assert_eq!(second.unwrap_err(), OrchestratorError::Busy);
    let first = first?;
    assert_eq!(first.outcomes.len(), 3);
    assert_eq!(first.edges[&Edge::ClientStorage], EdgeHealth::Down);
    assert_eq!(first.edges[&Edge::ClientBackend], EdgeHealth::Ok);
    assert_eq!(first.overall, EdgeHealth::Down);
    assert!(!first.log.iter().any(|line| line.contains("Rejected")));
    Ok(())
}
