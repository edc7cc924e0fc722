//! Ranker trait definition.

use crate::core::{DatasetId, PipelineId};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One entry of a ranking. Higher scores rank first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedPipeline {
    /// Pipeline id.
    pub pipeline_id: PipelineId,
    /// Ranking score.
    pub score: f64,
}

impl RankedPipeline {
    /// Creates an entry.
    #[must_use]
    pub const fn new(pipeline_id: PipelineId, score: f64) -> Self {
        Self { pipeline_id, score }
    }
}

/// Trait for rankers recommending pipelines for a dataset.
///
/// Orchestration seeds the ranker, trains it on a set of datasets and
/// pipelines, then asks it to order candidate pipelines.
pub trait Ranker {
    /// Seeds any randomness used during training.
    fn initialize(&mut self, seed: u64);

    /// Trains the ranker, replacing any previous model.
    ///
    /// # Errors
    ///
    /// Returns an error if the training data cannot be produced. A failed
    /// call leaves the ranker untrained.
    fn train(&mut self, dataset_ids: &[DatasetId], pipeline_ids: &[PipelineId]) -> Result<()>;

    /// Orders `pipeline_ids` for `dataset_id`, best first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RankingError::NotTrained`] before a successful
    /// `train`.
    fn rank(
        &self,
        pipeline_ids: &[PipelineId],
        dataset_id: DatasetId,
    ) -> Result<Vec<RankedPipeline>>;

    /// Deterministic identifier of the ranker and its parameters.
    fn name(&self) -> String;
}
