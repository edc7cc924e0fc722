//! Ranking-imitating generator.
//!
//! Builds the exhaustive table and then appends synthetic ranking groups:
//! for each training dataset, `rankings_per_dataset` groups of
//! `length_of_ranking` pipelines drawn uniformly at random. A group never
//! repeats a pipeline or a performance value, so the targets inside a group
//! always induce a strict ranking.
//!
//! Drawing stops with an error instead of looping when a dataset cannot
//! supply enough distinct measured performances.

use crate::core::{Attribute, DatasetId, PipelineId, SparsePair, TrainingTable};
use crate::error::{RankingError, Result};
use crate::generator::features::FeatureSource;
use crate::generator::traits::{DatasetGenerator, GeneratedDataset};
use crate::generator::{DEFAULT_MAX_DRAWS_PER_RANKING, RELATION_NAME};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace, warn};

/// Sampling parameters of the ranking-imitating generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImitationConfig {
    /// Pipelines per synthetic ranking group.
    pub length_of_ranking: usize,
    /// Groups sampled per training dataset.
    pub rankings_per_dataset: usize,
    /// Draws allowed per group before giving up.
    #[serde(default = "default_max_draws")]
    pub max_draws_per_ranking: usize,
}

const fn default_max_draws() -> usize {
    DEFAULT_MAX_DRAWS_PER_RANKING
}

impl ImitationConfig {
    /// Creates a config with the default draw limit.
    #[must_use]
    pub const fn new(length_of_ranking: usize, rankings_per_dataset: usize) -> Self {
        Self {
            length_of_ranking,
            rankings_per_dataset,
            max_draws_per_ranking: DEFAULT_MAX_DRAWS_PER_RANKING,
        }
    }

    /// Sets the draw limit per group.
    #[must_use]
    pub const fn with_max_draws(mut self, max_draws: usize) -> Self {
        self.max_draws_per_ranking = max_draws;
        self
    }

    /// Checks the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RankingError::InvalidConfig`] if the draw limit is zero
    /// while groups are requested.
    pub fn validate(&self) -> Result<()> {
        if self.max_draws_per_ranking == 0 && self.length_of_ranking > 0 {
            return Err(RankingError::InvalidConfig {
                reason: "max_draws_per_ranking must be > 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Generator that imitates list-wise ranking data.
///
/// # Examples
///
/// ```
/// use pipeline_rank::core::Attribute;
/// use pipeline_rank::generator::{
///     DatasetGenerator, FeatureSource, ImitationConfig, RankingImitationGenerator,
/// };
/// use pipeline_rank::storage::{InMemoryFeatureMap, InMemoryPerformanceStore};
///
/// let store = InMemoryPerformanceStore::new()
///     .with_performance(1, 10, 0.9)
///     .with_performance(2, 10, 0.5);
/// let mut pipelines = InMemoryFeatureMap::pipelines(vec![Attribute::numeric("p")]);
/// pipelines.insert(1, vec![1.0_f64.into()]).unwrap();
/// pipelines.insert(2, vec![2.0_f64.into()]).unwrap();
/// let mut datasets = InMemoryFeatureMap::datasets(vec![Attribute::numeric("d")]);
/// datasets.insert(10, vec![0.0_f64.into()]).unwrap();
///
/// let mut generator = RankingImitationGenerator::new(
///     FeatureSource::new(&store, &pipelines, &datasets),
///     ImitationConfig::new(2, 3),
/// );
/// generator.initialize(42);
///
/// let generated = generator.generate_for_datasets(&[10]).unwrap();
/// // two exhaustive rows plus three groups of two
/// assert_eq!(generated.table.len(), 8);
/// ```
#[derive(Debug)]
pub struct RankingImitationGenerator<'a> {
    source: FeatureSource<'a>,
    config: ImitationConfig,
    rng: Option<ChaCha8Rng>,
    attributes: Option<Vec<Attribute>>,
}

impl<'a> RankingImitationGenerator<'a> {
    /// Creates an unseeded generator.
    #[must_use]
    pub const fn new(source: FeatureSource<'a>, config: ImitationConfig) -> Self {
        Self {
            source,
            config,
            rng: None,
            attributes: None,
        }
    }

    /// Returns the sampling parameters.
    #[must_use]
    pub const fn config(&self) -> &ImitationConfig {
        &self.config
    }

    /// Returns `true` once a seed has been set.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.rng.is_some()
    }

    /// Builds the training dataset over every pipeline of the store.
    ///
    /// # Errors
    ///
    /// - [`RankingError::GeneratorNotInitialized`] before [`DatasetGenerator::initialize`].
    /// - [`RankingError::InsufficientData`] if a dataset has fewer distinct
    ///   measured performances than the ranking length.
    /// - [`RankingError::SamplingExhausted`] if a group hits the draw limit.
    /// - Feature lookup errors from the feature maps.
    pub fn generate_for_datasets(&mut self, dataset_ids: &[DatasetId]) -> Result<GeneratedDataset> {
        let name = self.name();
        let Some(rng) = self.rng.as_mut() else {
            return Err(RankingError::GeneratorNotInitialized { name }.into());
        };
        self.config.validate()?;

        let source = self.source;
        let store = source.store();
        let pipeline_ids = store.pipeline_ids();

        let attributes = source.schema();
        let mut table = TrainingTable::new(RELATION_NAME, attributes.clone());
        let mut pairs = Vec::new();

        for &pipeline_id in &pipeline_ids {
            for &dataset_id in dataset_ids {
                if let Some(target) = store.performance(pipeline_id, dataset_id).value() {
                    table.push(source.row(dataset_id, pipeline_id, target)?);
                    pairs.push(SparsePair::new(dataset_id, pipeline_id));
                }
            }
        }
        let exhaustive_rows = table.len();

        if self.config.rankings_per_dataset > 0 && self.config.length_of_ranking > 0 {
            for &dataset_id in dataset_ids {
                let candidates = measured_candidates(&source, &pipeline_ids, dataset_id);
                ensure_distinct_performances(&candidates, dataset_id, self.config.length_of_ranking)?;
                for _ in 0..self.config.rankings_per_dataset {
                    for (pipeline_id, target) in
                        sample_group(&candidates, &self.config, rng, dataset_id)?
                    {
                        table.push(source.row(dataset_id, pipeline_id, target)?);
                        pairs.push(SparsePair::new(dataset_id, pipeline_id));
                    }
                }
            }
        }

        debug!(
            generator = %name,
            datasets = dataset_ids.len(),
            exhaustive_rows,
            sampled_rows = table.len() - exhaustive_rows,
            "generated training dataset"
        );

        self.attributes = Some(attributes);
        Ok(GeneratedDataset { table, pairs })
    }
}

/// Pipelines measured on a dataset, with their performances, in store order.
fn measured_candidates(
    source: &FeatureSource<'_>,
    pipeline_ids: &[PipelineId],
    dataset_id: DatasetId,
) -> Vec<(PipelineId, f64)> {
    let store = source.store();
    pipeline_ids
        .iter()
        .filter_map(|&id| store.performance(id, dataset_id).value().map(|v| (id, v)))
        .collect()
}

/// Fails fast when no group of the requested length can exist for a dataset.
fn ensure_distinct_performances(
    candidates: &[(PipelineId, f64)],
    dataset_id: DatasetId,
    length_of_ranking: usize,
) -> Result<()> {
    let available = candidates
        .iter()
        .map(|&(_, value)| value.to_bits())
        .collect::<HashSet<_>>()
        .len();

    if available < length_of_ranking {
        warn!(
            dataset_id,
            available,
            required = length_of_ranking,
            "not enough distinct measured performances for a ranking group"
        );
        return Err(RankingError::InsufficientData {
            dataset_id,
            required: length_of_ranking,
            available,
        }
        .into());
    }
    Ok(())
}

/// Draws one ranking group from the measured candidates of a dataset.
///
/// Returns the accepted pipelines and their performances in draw order.
fn sample_group(
    candidates: &[(PipelineId, f64)],
    config: &ImitationConfig,
    rng: &mut ChaCha8Rng,
    dataset_id: DatasetId,
) -> Result<Vec<(PipelineId, f64)>> {
    let mut group: Vec<(PipelineId, f64)> = Vec::with_capacity(config.length_of_ranking);
    let mut performances_seen: HashSet<u64> = HashSet::with_capacity(config.length_of_ranking);
    let mut draws = 0;

    while group.len() < config.length_of_ranking {
        if draws >= config.max_draws_per_ranking {
            warn!(dataset_id, draws, accepted = group.len(), "ranking group draw limit reached");
            return Err(RankingError::SamplingExhausted {
                dataset_id,
                required: config.length_of_ranking,
                accepted: group.len(),
                draws,
            }
            .into());
        }
        draws += 1;

        let (candidate, value) = candidates[rng.gen_range(0..candidates.len())];
        if group.iter().any(|&(id, _)| id == candidate) {
            continue;
        }
        if performances_seen.insert(value.to_bits()) {
            group.push((candidate, value));
        }
    }

    trace!(dataset_id, draws, "sampled ranking group");
    Ok(group)
}

impl DatasetGenerator for RankingImitationGenerator<'_> {
    fn initialize(&mut self, seed: u64) {
        self.rng = Some(ChaCha8Rng::seed_from_u64(seed));
    }

    fn generate_training_dataset(
        &mut self,
        dataset_ids: &[DatasetId],
        _pipeline_ids: &[PipelineId],
    ) -> Result<GeneratedDataset> {
        self.generate_for_datasets(dataset_ids)
    }

    fn name(&self) -> String {
        format!(
            "ranking_imitating_{}_{}",
            self.config.length_of_ranking, self.config.rankings_per_dataset
        )
    }

    fn attribute_info(&self) -> Option<&[Attribute]> {
        self.attributes.as_deref()
    }
}
