//! Core domain models.
//!
//! Performance values, rank statistics, and the tabular training data
//! exchanged between generators and rankers. These are pure value types
//! with no collaborator dependencies.

pub mod performance;
pub mod statistics;
pub mod table;

pub use performance::Performance;
pub use statistics::RankStatistics;
pub use table::{
    Attribute, AttributeKind, DatasetId, FeatureValue, PipelineId, SparsePair, TARGET_ATTRIBUTE,
    TrainingRow, TrainingTable,
};
