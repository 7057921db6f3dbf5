//! Network probe module
//!
//! This module provides everything that touches the wire during a health run:
//! - **Client** - `ProbeClient` trait and its reqwest-backed implementation
//! - **Targets** - Resolution of storage and backend URLs from configuration
//! - **Catalog** - The backend function smoke-test catalog and its payloads
//! - **Retry** - Timeout wrapper and the schema-cache retry policy
//!
//! Every failure is converted into a [`crate::types::ProbeOutcome`] before it
//! leaves the client, so callers never handle transport errors directly.

pub mod catalog;
pub mod client;
pub mod retry;
pub mod targets;

// Re-export main types
pub use catalog::{default_function_catalog, FunctionPayload, FunctionSpec};
pub use client::{classify_status, HttpProbeClient, ProbeClient};
pub use retry::{execute_with_timeout, RetryPolicy};
pub use targets::ProbeTargets;
