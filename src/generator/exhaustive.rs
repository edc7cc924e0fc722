//! Exhaustive generator.
//!
//! Emits one row for every measured (dataset, pipeline) pair in the
//! requested scope. Deterministic.

use crate::core::{Attribute, DatasetId, PipelineId, SparsePair, TrainingTable};
use crate::error::Result;
use crate::generator::RELATION_NAME;
use crate::generator::features::FeatureSource;
use crate::generator::traits::{DatasetGenerator, GeneratedDataset};
use std::collections::HashSet;
use tracing::debug;

/// Generator producing the plain (dataset, pipeline) → performance table.
#[derive(Debug)]
pub struct ExhaustiveGenerator<'a> {
    source: FeatureSource<'a>,
    attributes: Option<Vec<Attribute>>,
}

impl<'a> ExhaustiveGenerator<'a> {
    /// Creates a generator over the given collaborators.
    #[must_use]
    pub const fn new(source: FeatureSource<'a>) -> Self {
        Self {
            source,
            attributes: None,
        }
    }
}

impl DatasetGenerator for ExhaustiveGenerator<'_> {
    fn initialize(&mut self, _seed: u64) {}

    fn generate_training_dataset(
        &mut self,
        dataset_ids: &[DatasetId],
        pipeline_ids: &[PipelineId],
    ) -> Result<GeneratedDataset> {
        let attributes = self.source.schema();
        let mut table = TrainingTable::new(RELATION_NAME, attributes.clone());
        let mut pairs = Vec::new();

        let allowed: HashSet<PipelineId> = pipeline_ids.iter().copied().collect();
        let store = self.source.store();

        for pipeline_id in store.pipeline_ids() {
            if !allowed.contains(&pipeline_id) {
                continue;
            }
            for &dataset_id in dataset_ids {
                if let Some(target) = store.performance(pipeline_id, dataset_id).value() {
                    table.push(self.source.row(dataset_id, pipeline_id, target)?);
                    pairs.push(SparsePair::new(dataset_id, pipeline_id));
                }
            }
        }

        debug!(
            generator = "exhaustive",
            datasets = dataset_ids.len(),
            rows = table.len(),
            "generated training dataset"
        );

        self.attributes = Some(attributes);
        Ok(GeneratedDataset { table, pairs })
    }

    fn name(&self) -> String {
        "exhaustive".to_string()
    }

    fn attribute_info(&self) -> Option<&[Attribute]> {
        self.attributes.as_deref()
    }
}
