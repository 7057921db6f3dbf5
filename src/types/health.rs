//! Topology health types

use serde::{Deserialize, Serialize};

/// Health level of one edge, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeHealth {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "WARN")]
    Warn,
    #[serde(rename = "DOWN")]
    Down,
}

impl EdgeHealth {
    /// Worst-of combination
    pub fn worst(self, other: EdgeHealth) -> EdgeHealth {
        self.max(other)
    }

    /// 2xx OK, 4xx WARN, everything else (5xx, no response) DOWN
    pub fn from_http_status(status: Option<u16>) -> EdgeHealth {
        match status {
            Some(200..=299) => EdgeHealth::Ok,
            Some(400..=499) => EdgeHealth::Warn,
            _ => EdgeHealth::Down,
        }
    }

    /// Log tag, always distinct per level
    pub fn tag(&self) -> &'static str {
        match self {
            EdgeHealth::Ok => "OK",
            EdgeHealth::Warn => "WARN",
            EdgeHealth::Down => "DOWN",
        }
    }
}

impl std::fmt::Display for EdgeHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One pairwise connectivity relationship of the client/backend/storage topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    ClientBackend,
    BackendStorage,
    ClientStorage,
}

impl Edge {
    pub const ALL: [Edge; 3] = [Edge::ClientBackend, Edge::BackendStorage, Edge::ClientStorage];

    pub fn display_name(&self) -> &'static str {
        match self {
            Edge::ClientBackend => "client↔backend",
            Edge::BackendStorage => "backend↔storage",
            Edge::ClientStorage => "client↔storage",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Edge::ClientBackend => 0,
            Edge::BackendStorage => 1,
            Edge::ClientStorage => 2,
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
