//! Tabular training data produced by the dataset generators.
//!
//! A [`TrainingTable`] holds one row per emitted (dataset, pipeline) pair:
//! the dataset's features, then the pipeline's features, then the measured
//! performance as the target. The table is a thin container; model code
//! downstream decides how to consume it.

use serde::{Deserialize, Serialize};

/// Identifier of a candidate pipeline.
pub type PipelineId = i64;

/// Identifier of a dataset.
pub type DatasetId = i64;

/// Name of the target attribute appended to every schema.
pub const TARGET_ATTRIBUTE: &str = "performance";

/// Type of an attribute column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum AttributeKind {
    /// Real-valued column.
    Numeric,
    /// Categorical column with its admissible values.
    Nominal(Vec<String>),
}

/// A named, typed column of a training table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Column name.
    pub name: String,
    /// Column type.
    pub kind: AttributeKind,
}

impl Attribute {
    /// Creates a numeric attribute.
    #[must_use]
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    /// Creates a nominal attribute.
    #[must_use]
    pub fn nominal(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal(values),
        }
    }

    /// Returns `true` for numeric columns.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.kind, AttributeKind::Numeric)
    }
}

/// A single cell of a feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Real value.
    Numeric(f64),
    /// Categorical value.
    Nominal(String),
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        Self::Nominal(value.to_string())
    }
}

/// A (dataset, pipeline) combination used for training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SparsePair {
    /// Dataset of the pair.
    pub dataset_id: DatasetId,
    /// Pipeline of the pair.
    pub pipeline_id: PipelineId,
}

impl SparsePair {
    /// Creates a pair.
    #[must_use]
    pub const fn new(dataset_id: DatasetId, pipeline_id: PipelineId) -> Self {
        Self {
            dataset_id,
            pipeline_id,
        }
    }
}

/// One training example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    /// Dataset the row describes.
    pub dataset_id: DatasetId,
    /// Pipeline the row describes.
    pub pipeline_id: PipelineId,
    /// Dataset features followed by pipeline features.
    pub features: Vec<FeatureValue>,
    /// Measured performance.
    pub target: f64,
}

/// Training table with a fixed attribute schema.
///
/// The last attribute is always the numeric target column
/// ([`TARGET_ATTRIBUTE`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingTable {
    /// Relation name.
    pub relation: String,
    /// Dataset attributes, pipeline attributes, target.
    pub attributes: Vec<Attribute>,
    /// Rows in emission order.
    pub rows: Vec<TrainingRow>,
}

impl TrainingTable {
    /// Creates an empty table over `attributes`.
    #[must_use]
    pub fn new(relation: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            relation: relation.into(),
            attributes,
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push(&mut self, row: TrainingRow) {
        self.rows.push(row);
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the target column.
    #[must_use]
    pub fn class_index(&self) -> usize {
        self.attributes.len().saturating_sub(1)
    }

    /// Rows emitted for one dataset.
    pub fn rows_for_dataset(&self, dataset_id: DatasetId) -> impl Iterator<Item = &TrainingRow> {
        self.rows.iter().filter(move |row| row.dataset_id == dataset_id)
    }
}
