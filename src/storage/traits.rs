//! Collaborator trait definitions.
//!
//! Defines the read-only lookups the generators and rankers consume:
//! measured performances and feature representations. Implementations
//! are owned by the caller and must present a stable snapshot for the
//! duration of one `train` or generation call.

use crate::core::{Attribute, DatasetId, FeatureValue, Performance, PipelineId};
use crate::error::Result;

/// Source of (pipeline, dataset) performance measurements.
pub trait PerformanceStore: Send + Sync {
    /// Returns every known pipeline id.
    ///
    /// The order is the iteration order used for ranking ties, so it must be
    /// stable across calls.
    fn pipeline_ids(&self) -> Vec<PipelineId>;

    /// Returns the performance of a pipeline on a dataset.
    ///
    /// Pairs that were never measured yield [`Performance::Unmeasured`].
    fn performance(&self, pipeline_id: PipelineId, dataset_id: DatasetId) -> Performance;

    /// Returns the number of known pipelines.
    fn pipeline_count(&self) -> usize {
        self.pipeline_ids().len()
    }
}

/// Maps dataset or pipeline ids to feature vectors.
pub trait FeatureMap: Send + Sync {
    /// Ordered attribute schema of the feature vectors.
    fn attributes(&self) -> &[Attribute];

    /// Returns the feature vector of `id`, aligned with [`Self::attributes`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::StorageError::FeatureVectorNotFound`] if the id
    /// has no representation.
    fn feature_vector(&self, id: i64) -> Result<Vec<FeatureValue>>;
}
