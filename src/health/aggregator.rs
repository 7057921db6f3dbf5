//! Edge status aggregation
//!
//! Keeps the last known health of each topology edge and folds them into one
//! overall status using worst-of precedence (OK < WARN < DOWN). An edge that
//! has never been probed reads as WARN: unknown is degraded, not healthy and
//! not failed.

use crate::types::{Edge, EdgeHealth, ProbeErrorKind, ProbeOutcome};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeStatusAggregator {
    edges: [Option<EdgeHealth>; 3],
}

impl EdgeStatusAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generic outcome mapping: ok is OK, a 4xx is WARN, anything else is DOWN
    pub fn health_for_outcome(outcome: &ProbeOutcome) -> EdgeHealth {
        if outcome.ok {
            EdgeHealth::Ok
        } else if outcome.error_kind == ProbeErrorKind::ClientError {
            EdgeHealth::Warn
        } else {
            EdgeHealth::Down
        }
    }

    /// Apply a probe outcome to one edge, leaving the others untouched
    pub fn update(&mut self, edge: Edge, outcome: &ProbeOutcome) -> EdgeHealth {
        self.force(edge, Self::health_for_outcome(outcome))
    }

    /// Set an edge directly, for probe-specific rules that override the generic mapping
    pub fn force(&mut self, edge: Edge, health: EdgeHealth) -> EdgeHealth {
        self.edges[edge.index()] = Some(health);
        health
    }

    /// Last known health of an edge; WARN until it has been probed
    pub fn current(&self, edge: Edge) -> EdgeHealth {
        self.edges[edge.index()].unwrap_or(EdgeHealth::Warn)
    }

    pub fn is_known(&self, edge: Edge) -> bool {
        self.edges[edge.index()].is_some()
    }

    /// Worst of the three edges
    pub fn overall(&self) -> EdgeHealth {
        Edge::ALL
            .iter()
            .map(|edge| self.current(*edge))
            .fold(EdgeHealth::Ok, EdgeHealth::worst)
    }

    pub fn snapshot(&self) -> BTreeMap<Edge, EdgeHealth> {
        Edge::ALL
            .iter()
            .map(|edge| (*edge, self.current(*edge)))
            .collect()
    }
}
