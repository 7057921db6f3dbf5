//! Unit Tests Module
//!
//! Component-level tests run against fakes from `common`.

pub mod analysis;
pub mod health;
pub mod probe;
