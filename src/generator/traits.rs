//! Dataset generator trait definition.
//!
//! Defines the interface through which rankers obtain training data and the
//! (dataset, pipeline) pairs that make up the training scope.

use crate::core::{Attribute, DatasetId, PipelineId, SparsePair, TrainingTable};
use crate::error::Result;

/// Output of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDataset {
    /// The training table.
    pub table: TrainingTable,
    /// One pair per emitted row, in row order.
    pub pairs: Vec<SparsePair>,
}

impl GeneratedDataset {
    /// Pipelines paired with `dataset_id`, in emission order, duplicates kept.
    pub fn pipelines_for_dataset(
        &self,
        dataset_id: DatasetId,
    ) -> impl Iterator<Item = PipelineId> + '_ {
        self.pairs
            .iter()
            .filter(move |pair| pair.dataset_id == dataset_id)
            .map(|pair| pair.pipeline_id)
    }
}

/// Trait for turning sparse performance measurements into training data.
///
/// Each call recomputes the dataset from scratch; nothing accumulates
/// across calls except the attribute schema of the latest call.
///
/// # Examples
///
/// ```
/// use pipeline_rank::core::Attribute;
/// use pipeline_rank::generator::{DatasetGenerator, ExhaustiveGenerator, FeatureSource};
/// use pipeline_rank::storage::{InMemoryFeatureMap, InMemoryPerformanceStore};
///
/// let store = InMemoryPerformanceStore::new().with_performance(1, 10, 0.7);
/// let mut pipelines = InMemoryFeatureMap::pipelines(vec![Attribute::numeric("p")]);
/// pipelines.insert(1, vec![1.0_f64.into()]).unwrap();
/// let mut datasets = InMemoryFeatureMap::datasets(vec![Attribute::numeric("d")]);
/// datasets.insert(10, vec![2.0_f64.into()]).unwrap();
///
/// let mut generator =
///     ExhaustiveGenerator::new(FeatureSource::new(&store, &pipelines, &datasets));
/// let generated = generator.generate_training_dataset(&[10], &[1]).unwrap();
/// assert_eq!(generated.table.len(), 1);
/// ```
pub trait DatasetGenerator {
    /// Seeds the generator's random source.
    ///
    /// Re-seeding restarts the random sequence.
    fn initialize(&mut self, seed: u64);

    /// Builds the training dataset for the given datasets and pipelines.
    ///
    /// Generators that do not filter by pipeline ignore `pipeline_ids`.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator is not ready, the data cannot
    /// support the requested sampling, or a feature lookup fails.
    fn generate_training_dataset(
        &mut self,
        dataset_ids: &[DatasetId],
        pipeline_ids: &[PipelineId],
    ) -> Result<GeneratedDataset>;

    /// Deterministic identifier encoding the generator's parameters.
    fn name(&self) -> String;

    /// Attribute schema of the most recent generation call.
    ///
    /// `None` before the first call.
    fn attribute_info(&self) -> Option<&[Attribute]>;
}
