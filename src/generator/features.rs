//! Row construction shared by the generators.

use crate::core::{Attribute, DatasetId, PipelineId, TARGET_ATTRIBUTE, TrainingRow};
use crate::error::Result;
use crate::storage::{FeatureMap, PerformanceStore};

/// The collaborators a generator reads from.
///
/// Bundles the performance store with the dataset and pipeline feature maps
/// so every generator builds schemas and rows the same way.
#[derive(Clone, Copy)]
pub struct FeatureSource<'a> {
    store: &'a dyn PerformanceStore,
    pipeline_features: &'a dyn FeatureMap,
    dataset_features: &'a dyn FeatureMap,
}

impl<'a> FeatureSource<'a> {
    /// Creates a source over borrowed collaborators.
    #[must_use]
    pub fn new(
        store: &'a dyn PerformanceStore,
        pipeline_features: &'a dyn FeatureMap,
        dataset_features: &'a dyn FeatureMap,
    ) -> Self {
        Self {
            store,
            pipeline_features,
            dataset_features,
        }
    }

    /// The performance store.
    #[must_use]
    pub fn store(&self) -> &'a dyn PerformanceStore {
        self.store
    }

    /// Dataset attributes, then pipeline attributes, then the numeric target.
    #[must_use]
    pub fn schema(&self) -> Vec<Attribute> {
        let datasets = self.dataset_features.attributes();
        let pipelines = self.pipeline_features.attributes();

        let mut attributes = Vec::with_capacity(datasets.len() + pipelines.len() + 1);
        attributes.extend_from_slice(datasets);
        attributes.extend_from_slice(pipelines);
        attributes.push(Attribute::numeric(TARGET_ATTRIBUTE));
        attributes
    }

    /// Builds the row for a pair with the given target.
    ///
    /// # Errors
    ///
    /// Propagates a missing feature vector from either map.
    pub fn row(
        &self,
        dataset_id: DatasetId,
        pipeline_id: PipelineId,
        target: f64,
    ) -> Result<TrainingRow> {
        let mut features = self.dataset_features.feature_vector(dataset_id)?;
        features.extend(self.pipeline_features.feature_vector(pipeline_id)?);

        Ok(TrainingRow {
            dataset_id,
            pipeline_id,
            features,
            target,
        })
    }
}

impl std::fmt::Debug for FeatureSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureSource")
            .field("pipelines", &self.store.pipeline_count())
            .field("dataset_attributes", &self.dataset_features.attributes().len())
            .field("pipeline_attributes", &self.pipeline_features.attributes().len())
            .finish()
    }
}
