//! # pipeline-rank
//!
//! Ranks candidate pipelines (algorithm configurations) by how well they
//! performed on a collection of datasets, to recommend pipelines for new
//! datasets.
//!
//! ## Features
//!
//! - **Average-rank ranking**: global ranking by mean per-dataset rank, with
//!   optional bayesian-style dense backfilling
//! - **Training data generation**: exhaustive (dataset, pipeline) tables and
//!   ranking-imitating tables with randomly sampled ranking groups
//! - **Explicit missing data**: unmeasured performances are a distinct state,
//!   never a magic number
//!
//! Performance measurements and feature representations are read through
//! the [`PerformanceStore`] and [`FeatureMap`] traits; in-memory
//! implementations are provided.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod core;
pub mod error;
pub mod generator;
pub mod ranking;
pub mod storage;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use crate::core::{
    Attribute, AttributeKind, DatasetId, FeatureValue, Performance, PipelineId, RankStatistics,
    SparsePair, TrainingRow, TrainingTable,
};

// Re-export storage types
pub use storage::{FeatureMap, InMemoryFeatureMap, InMemoryPerformanceStore, PerformanceStore};

// Re-export generator types
pub use generator::{
    DatasetGenerator, ExhaustiveGenerator, FeatureSource, GeneratedDataset, GeneratorConfig,
    ImitationConfig, RankingImitationGenerator, available_strategies, create_generator,
};

// Re-export ranking types
pub use ranking::{AverageRankRanker, AveragingMode, RankedPipeline, Ranker, RankerConfig};
