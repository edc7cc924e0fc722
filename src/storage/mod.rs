//! Collaborator layer.
//!
//! Performance measurements and feature representations live outside the
//! ranking core. This module defines the traits the core reads them through
//! and in-memory implementations of both.

pub mod memory;
pub mod traits;

pub use memory::{InMemoryFeatureMap, InMemoryPerformanceStore, PerformanceRecord};
pub use traits::{FeatureMap, PerformanceStore};
