//! Storage health monitor - Type System
//!
//! - `probe`: Probe specifications and normalised outcomes (ProbeSpec, ProbeOutcome, etc.)
//! - `health`: Topology edges and the ordered OK/WARN/DOWN health levels
//! - `analytics`: Usage categories, object records and analytics snapshots
//! - `settings`: The persisted storage settings record

pub mod analytics;
pub mod health;
pub mod probe;
pub mod settings;

pub use analytics::{AnalyticsSnapshot, Category, DailyUploadCount, ObjectRecord};
pub use health::{Edge, EdgeHealth};
pub use probe::{
    HttpMethod, ProbeErrorKind, ProbeKind, ProbeOutcome, ProbePayload, ProbeResponse, ProbeSpec,
};
pub use settings::StorageSettings;
