//! Training dataset generators.
//!
//! Generators turn the sparse (dataset, pipeline, performance) measurements
//! into a tabular learning dataset and report which pairs they used.
//! Two strategies are available:
//!
//! - **Exhaustive**: one row per measured pair in scope
//! - **Ranking imitation**: exhaustive rows plus randomly sampled ranking
//!   groups per dataset

pub mod exhaustive;
pub mod features;
pub mod imitation;
pub mod traits;

pub use exhaustive::ExhaustiveGenerator;
pub use features::FeatureSource;
pub use imitation::{ImitationConfig, RankingImitationGenerator};
pub use traits::{DatasetGenerator, GeneratedDataset};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Relation name of generated tables.
pub const RELATION_NAME: &str = "dataset";

/// Default number of draws before a ranking group is abandoned.
pub const DEFAULT_MAX_DRAWS_PER_RANKING: usize = 100_000;

/// Generator selection.
///
/// # Examples
///
/// ```
/// use pipeline_rank::generator::GeneratorConfig;
///
/// let config = GeneratorConfig::from_json(
///     r#"{"strategy": "ranking_imitation", "length_of_ranking": 5, "rankings_per_dataset": 20}"#,
/// )
/// .unwrap();
/// assert!(matches!(config, GeneratorConfig::RankingImitation(_)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// [`ExhaustiveGenerator`].
    #[default]
    Exhaustive,
    /// [`RankingImitationGenerator`].
    RankingImitation(ImitationConfig),
}

impl GeneratorConfig {
    /// Parses a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Creates a generator from its config.
///
/// # Errors
///
/// Returns [`crate::error::RankingError::InvalidConfig`] if the config fails
/// validation.
pub fn create_generator<'a>(
    config: &GeneratorConfig,
    source: FeatureSource<'a>,
) -> Result<Box<dyn DatasetGenerator + 'a>> {
    match config {
        GeneratorConfig::Exhaustive => Ok(Box::new(ExhaustiveGenerator::new(source))),
        GeneratorConfig::RankingImitation(imitation) => {
            imitation.validate()?;
            Ok(Box::new(RankingImitationGenerator::new(source, *imitation)))
        }
    }
}

/// Creates a generator by strategy name with default parameters.
///
/// # Errors
///
/// Returns [`Error::Config`] for unknown names.
pub fn create_generator_by_name<'a>(
    name: &str,
    source: FeatureSource<'a>,
) -> Result<Box<dyn DatasetGenerator + 'a>> {
    let config = match name.to_lowercase().as_str() {
        "exhaustive" => GeneratorConfig::Exhaustive,
        "ranking_imitation" | "ranking-imitation" => GeneratorConfig::RankingImitation(
            ImitationConfig::new(DEFAULT_LENGTH_OF_RANKING, DEFAULT_RANKINGS_PER_DATASET),
        ),
        _ => {
            return Err(Error::Config {
                message: format!("unknown generator strategy: {name}"),
            });
        }
    };
    create_generator(&config, source)
}

/// Default ranking group length for [`create_generator_by_name`].
pub const DEFAULT_LENGTH_OF_RANKING: usize = 5;

/// Default groups per dataset for [`create_generator_by_name`].
pub const DEFAULT_RANKINGS_PER_DATASET: usize = 20;

/// Lists available generator strategy names.
#[must_use]
pub fn available_strategies() -> Vec<&'static str> {
    vec!["exhaustive", "ranking_imitation"]
}
