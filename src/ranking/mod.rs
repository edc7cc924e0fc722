//! Pipeline rankers.
//!
//! An average-rank ranker aggregates per-dataset ranks into one global
//! ordering. Two averaging modes are available:
//!
//! - **Normal**: mean rank over the generator's training pairs
//! - **Bayesian**: the same samples replayed on top of a dense pass that
//!   ranks every known pipeline on every training dataset

pub mod average;
pub mod rank;
pub mod traits;

pub use average::AverageRankRanker;
pub use rank::{StatisticsMap, rank_on_dataset, sort_by_performance};
pub use traits::{RankedPipeline, Ranker};

use crate::error::Result;
use crate::generator::{FeatureSource, GeneratorConfig, create_generator};
use crate::storage::{FeatureMap, PerformanceStore};
use serde::{Deserialize, Serialize};

/// Default seed used when a config does not set one.
pub const DEFAULT_SEED: u64 = 0;

/// How per-dataset ranks are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AveragingMode {
    /// Mean over the sparse training pairs.
    #[default]
    Normal,
    /// Sparse samples merged into a dense backfill.
    Bayesian,
}

/// Configuration for building an [`AverageRankRanker`].
///
/// # Examples
///
/// ```
/// use pipeline_rank::ranking::{AveragingMode, RankerConfig};
///
/// let config = RankerConfig::from_json(
///     r#"{
///         "averaging": "bayesian",
///         "generator": {"strategy": "ranking_imitation", "length_of_ranking": 3, "rankings_per_dataset": 10},
///         "seed": 7
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(config.averaging, AveragingMode::Bayesian);
/// assert_eq!(config.seed, 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    /// Averaging mode.
    pub averaging: AveragingMode,
    /// Generator defining the training scope.
    pub generator: GeneratorConfig,
    /// Seed passed to the generator.
    pub seed: u64,
}

impl RankerConfig {
    /// Creates a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Config`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the averaging mode.
    #[must_use]
    pub const fn with_averaging(mut self, averaging: AveragingMode) -> Self {
        self.averaging = averaging;
        self
    }

    /// Sets the generator.
    #[must_use]
    pub const fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Sets the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds a seeded ranker over the given collaborators.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator config is invalid.
    pub fn build<'a>(
        &self,
        store: &'a dyn PerformanceStore,
        pipeline_features: &'a dyn FeatureMap,
        dataset_features: &'a dyn FeatureMap,
    ) -> Result<AverageRankRanker<'a>> {
        let source = FeatureSource::new(store, pipeline_features, dataset_features);
        let generator = create_generator(&self.generator, source)?;
        let mut ranker = AverageRankRanker::new(store, generator, self.averaging);
        ranker.initialize(self.seed);
        Ok(ranker)
    }
}
