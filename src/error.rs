//! Error types for pipeline ranking operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! collaborator lookups, dataset generation, and ranking.

use thiserror::Error;

/// Result type alias for pipeline ranking operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Errors raised by a performance store or feature map.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Errors raised while generating training data or ranking.
    #[error("ranking error: {0}")]
    Ranking(#[from] RankingError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

/// Which feature representation a lookup went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Dataset meta-features.
    Dataset,
    /// Pipeline features.
    Pipeline,
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dataset => f.write_str("dataset"),
            Self::Pipeline => f.write_str("pipeline"),
        }
    }
}

/// Errors from the external collaborators (performance store, feature maps).
#[derive(Error, Debug)]
pub enum StorageError {
    /// No feature vector is registered for the id.
    #[error("no {kind} feature vector for id {id}")]
    FeatureVectorNotFound {
        /// Which feature map was queried.
        kind: FeatureKind,
        /// The id that was looked up.
        id: i64,
    },

    /// Feature vector length does not match the attribute schema.
    #[error("{kind} feature vector for id {id} has {actual} values, expected {expected}")]
    FeatureLengthMismatch {
        /// Which feature map rejected the vector.
        kind: FeatureKind,
        /// The id of the vector.
        id: i64,
        /// Number of attributes in the schema.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors from dataset generation and ranking.
#[derive(Error, Debug)]
pub enum RankingError {
    /// A ranking was requested before `train` was called.
    #[error("ranker has not been trained")]
    NotTrained,

    /// Sampling was requested before the generator was seeded.
    #[error("generator {name} has not been initialized with a seed")]
    GeneratorNotInitialized {
        /// Name of the generator.
        name: String,
    },

    /// Not enough pipelines with distinct measured performances to build a ranking group.
    #[error(
        "dataset {dataset_id} has {available} distinct measured performances, ranking length {required} required"
    )]
    InsufficientData {
        /// Dataset being sampled.
        dataset_id: i64,
        /// Ranking length requested.
        required: usize,
        /// Distinct measured performances available.
        available: usize,
    },

    /// A ranking group could not be completed within the draw limit.
    #[error(
        "dataset {dataset_id}: gave up after {draws} draws with {accepted} of {required} pipelines accepted"
    )]
    SamplingExhausted {
        /// Dataset being sampled.
        dataset_id: i64,
        /// Ranking length requested.
        required: usize,
        /// Pipelines accepted before giving up.
        accepted: usize,
        /// Draws performed.
        draws: usize,
    },

    /// Invalid generator or ranker configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
