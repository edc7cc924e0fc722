//! In-memory collaborator implementations.
//!
//! Backs the performance store and feature maps with plain maps. Useful for
//! tests and for callers that already hold their measurements in memory.

use crate::core::{Attribute, DatasetId, FeatureValue, Performance, PipelineId};
use crate::error::{FeatureKind, Result, StorageError};
use crate::storage::traits::{FeatureMap, PerformanceStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Performance store held in memory.
///
/// Pipelines keep insertion order. Raw values go through
/// [`Performance::from_raw`], so non-positive inputs read back as unmeasured.
///
/// # Examples
///
/// ```
/// use pipeline_rank::core::Performance;
/// use pipeline_rank::storage::{InMemoryPerformanceStore, PerformanceStore};
///
/// let store = InMemoryPerformanceStore::new()
///     .with_performance(1, 100, 0.9)
///     .with_performance(2, 100, -1.0);
/// assert_eq!(store.performance(1, 100), Performance::Measured(0.9));
/// assert_eq!(store.performance(2, 100), Performance::Unmeasured);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryPerformanceStore {
    pipeline_ids: Vec<PipelineId>,
    performances: HashMap<PipelineId, HashMap<DatasetId, f64>>,
}

/// One (pipeline, dataset, value) triple, as found in performance dumps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    /// Pipeline id.
    pub pipeline_id: PipelineId,
    /// Dataset id.
    pub dataset_id: DatasetId,
    /// Raw value (`<= 0` means not measured).
    pub performance: f64,
}

impl InMemoryPerformanceStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from raw triples.
    #[must_use]
    pub fn from_records(records: &[PerformanceRecord]) -> Self {
        let mut store = Self::new();
        for record in records {
            store.insert(record.pipeline_id, record.dataset_id, record.performance);
        }
        store
    }

    /// Parses a JSON array of [`PerformanceRecord`]s.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<PerformanceRecord> =
            serde_json::from_str(json).map_err(StorageError::from)?;
        Ok(Self::from_records(&records))
    }

    /// Registers a pipeline without measurements.
    pub fn add_pipeline(&mut self, pipeline_id: PipelineId) {
        if !self.performances.contains_key(&pipeline_id) {
            self.pipeline_ids.push(pipeline_id);
            self.performances.insert(pipeline_id, HashMap::new());
        }
    }

    /// Records a raw performance value, replacing any previous one.
    pub fn insert(&mut self, pipeline_id: PipelineId, dataset_id: DatasetId, value: f64) {
        self.add_pipeline(pipeline_id);
        if let Some(row) = self.performances.get_mut(&pipeline_id) {
            row.insert(dataset_id, value);
        }
    }

    /// Builder variant of [`Self::insert`].
    #[must_use]
    pub fn with_performance(
        mut self,
        pipeline_id: PipelineId,
        dataset_id: DatasetId,
        value: f64,
    ) -> Self {
        self.insert(pipeline_id, dataset_id, value);
        self
    }
}

impl PerformanceStore for InMemoryPerformanceStore {
    fn pipeline_ids(&self) -> Vec<PipelineId> {
        self.pipeline_ids.clone()
    }

    fn performance(&self, pipeline_id: PipelineId, dataset_id: DatasetId) -> Performance {
        self.performances
            .get(&pipeline_id)
            .and_then(|row| row.get(&dataset_id))
            .map_or(Performance::Unmeasured, |&v| Performance::from_raw(v))
    }

    fn pipeline_count(&self) -> usize {
        self.pipeline_ids.len()
    }
}

/// Feature map held in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryFeatureMap {
    #[serde(skip, default = "default_kind")]
    kind: FeatureKind,
    attributes: Vec<Attribute>,
    vectors: HashMap<i64, Vec<FeatureValue>>,
}

const fn default_kind() -> FeatureKind {
    FeatureKind::Dataset
}

impl InMemoryFeatureMap {
    /// Creates an empty map with the given schema.
    #[must_use]
    pub fn new(kind: FeatureKind, attributes: Vec<Attribute>) -> Self {
        Self {
            kind,
            attributes,
            vectors: HashMap::new(),
        }
    }

    /// Creates a dataset feature map.
    #[must_use]
    pub fn datasets(attributes: Vec<Attribute>) -> Self {
        Self::new(FeatureKind::Dataset, attributes)
    }

    /// Creates a pipeline feature map.
    #[must_use]
    pub fn pipelines(attributes: Vec<Attribute>) -> Self {
        Self::new(FeatureKind::Pipeline, attributes)
    }

    /// Parses `{"attributes": [...], "vectors": {"<id>": [...]}}`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] for malformed JSON and
    /// [`StorageError::FeatureLengthMismatch`] if a vector does not fit the
    /// schema.
    pub fn from_json(kind: FeatureKind, json: &str) -> Result<Self> {
        let parsed: Self = serde_json::from_str(json).map_err(StorageError::from)?;
        let mut map = Self::new(kind, parsed.attributes);
        for (id, vector) in parsed.vectors {
            map.insert(id, vector)?;
        }
        Ok(map)
    }

    /// Which representation this map holds.
    #[must_use]
    pub const fn kind(&self) -> FeatureKind {
        self.kind
    }

    /// Registers the feature vector of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::FeatureLengthMismatch`] if the vector length
    /// differs from the attribute count.
    pub fn insert(&mut self, id: i64, vector: Vec<FeatureValue>) -> Result<()> {
        if vector.len() != self.attributes.len() {
            return Err(StorageError::FeatureLengthMismatch {
                kind: self.kind,
                id,
                expected: self.attributes.len(),
                actual: vector.len(),
            }
            .into());
        }
        self.vectors.insert(id, vector);
        Ok(())
    }

    /// Number of registered vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns `true` if no vector is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl FeatureMap for InMemoryFeatureMap {
    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    fn feature_vector(&self, id: i64) -> Result<Vec<FeatureValue>> {
        self.vectors.get(&id).cloned().ok_or_else(|| {
            StorageError::FeatureVectorNotFound {
                kind: self.kind,
                id,
            }
            .into()
        })
    }
}
