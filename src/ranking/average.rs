//! Average-rank ranker.
//!
//! Ranks pipelines globally by their mean per-dataset rank over the training
//! datasets. The generator decides which (dataset, pipeline) pairs form the
//! training scope; the performance store supplies the values being ranked.
//!
//! In bayesian mode the sparse statistics are backfilled with a dense pass
//! that ranks every known pipeline on every training dataset. The sparse
//! samples are then replayed into the dense statistics, so pipelines inside
//! the training scope weigh more than the backfilled ones.

use crate::core::{DatasetId, PipelineId};
use crate::error::{RankingError, Result};
use crate::generator::DatasetGenerator;
use crate::ranking::AveragingMode;
use crate::ranking::rank::{StatisticsMap, accumulate_ranks};
use crate::ranking::traits::{RankedPipeline, Ranker};
use crate::storage::PerformanceStore;
use std::collections::HashSet;
use tracing::debug;

/// Ranker scoring pipelines by negated mean rank.
///
/// # Examples
///
/// ```
/// use pipeline_rank::core::Attribute;
/// use pipeline_rank::generator::{ExhaustiveGenerator, FeatureSource};
/// use pipeline_rank::ranking::{AverageRankRanker, AveragingMode, RankedPipeline, Ranker};
/// use pipeline_rank::storage::{InMemoryFeatureMap, InMemoryPerformanceStore};
///
/// let store = InMemoryPerformanceStore::new()
///     .with_performance(1, 10, 0.9)
///     .with_performance(2, 10, 0.5)
///     .with_performance(3, 10, 0.7);
/// let mut pipelines = InMemoryFeatureMap::pipelines(vec![Attribute::numeric("p")]);
/// for id in 1..=3 {
///     pipelines.insert(id, vec![0.0_f64.into()]).unwrap();
/// }
/// let mut datasets = InMemoryFeatureMap::datasets(vec![Attribute::numeric("d")]);
/// datasets.insert(10, vec![0.0_f64.into()]).unwrap();
///
/// let generator = ExhaustiveGenerator::new(FeatureSource::new(&store, &pipelines, &datasets));
/// let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Normal);
/// ranker.train(&[10], &[1, 2, 3]).unwrap();
///
/// let ranking = ranker.rank(&[1, 2, 3], 10).unwrap();
/// assert_eq!(
///     ranking,
///     vec![
///         RankedPipeline::new(1, -1.0),
///         RankedPipeline::new(3, -2.0),
///         RankedPipeline::new(2, -3.0),
///     ]
/// );
/// ```
pub struct AverageRankRanker<'a> {
    store: &'a dyn PerformanceStore,
    generator: Box<dyn DatasetGenerator + 'a>,
    mode: AveragingMode,
    pipeline_ids: Vec<PipelineId>,
    ranking: Option<Vec<RankedPipeline>>,
}

impl<'a> AverageRankRanker<'a> {
    /// Creates an untrained ranker.
    ///
    /// The pipeline universe is the store's pipeline list at construction.
    #[must_use]
    pub fn new(
        store: &'a dyn PerformanceStore,
        generator: Box<dyn DatasetGenerator + 'a>,
        mode: AveragingMode,
    ) -> Self {
        Self {
            store,
            generator,
            mode,
            pipeline_ids: store.pipeline_ids(),
            ranking: None,
        }
    }

    /// Returns the averaging mode.
    #[must_use]
    pub const fn mode(&self) -> AveragingMode {
        self.mode
    }

    /// Returns the embedded generator.
    #[must_use]
    pub fn generator(&self) -> &dyn DatasetGenerator {
        self.generator.as_ref()
    }

    /// Returns the global ranking of the last `train` call.
    #[must_use]
    pub fn average_ranking(&self) -> Option<&[RankedPipeline]> {
        self.ranking.as_deref()
    }

    /// Ranks, per training dataset, the pipelines the generator paired with it.
    fn sparse_statistics(
        &mut self,
        dataset_ids: &[DatasetId],
        pipeline_ids: &[PipelineId],
    ) -> Result<StatisticsMap> {
        let generated = self
            .generator
            .generate_training_dataset(dataset_ids, pipeline_ids)?;

        let mut statistics = StatisticsMap::new();
        for &dataset_id in dataset_ids {
            let scope: Vec<PipelineId> = generated.pipelines_for_dataset(dataset_id).collect();
            accumulate_ranks(&mut statistics, self.store, &scope, dataset_id);
        }
        Ok(statistics)
    }

    /// Ranks every known pipeline on every training dataset.
    fn dense_statistics(&self, dataset_ids: &[DatasetId]) -> StatisticsMap {
        let mut statistics = StatisticsMap::with_capacity(self.pipeline_ids.len());
        for &dataset_id in dataset_ids {
            accumulate_ranks(&mut statistics, self.store, &self.pipeline_ids, dataset_id);
        }
        statistics
    }

    /// Negated mean ranks over the universe, best first.
    ///
    /// Pipelines without samples score `-(universe size)`.
    #[allow(clippy::cast_precision_loss)]
    fn score(&self, statistics: &StatisticsMap) -> Vec<RankedPipeline> {
        let worst = self.pipeline_ids.len() as f64;
        let mut ranking: Vec<RankedPipeline> = self
            .pipeline_ids
            .iter()
            .map(|&id| {
                let mean = statistics
                    .get(&id)
                    .and_then(|stats| stats.mean())
                    .unwrap_or(worst);
                RankedPipeline::new(id, -mean)
            })
            .collect();

        ranking.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranking
    }
}

impl Ranker for AverageRankRanker<'_> {
    fn initialize(&mut self, seed: u64) {
        self.generator.initialize(seed);
    }

    fn train(&mut self, dataset_ids: &[DatasetId], pipeline_ids: &[PipelineId]) -> Result<()> {
        self.ranking = None;
        let sparse = self.sparse_statistics(dataset_ids, pipeline_ids)?;

        let statistics = match self.mode {
            AveragingMode::Normal => sparse,
            AveragingMode::Bayesian => {
                let mut dense = self.dense_statistics(dataset_ids);
                for (id, samples) in &sparse {
                    dense.entry(*id).or_default().merge(samples);
                }
                dense
            }
        };

        let ranking = self.score(&statistics);
        debug!(
            ranker = %self.name(),
            datasets = dataset_ids.len(),
            scored = statistics.len(),
            universe = ranking.len(),
            "trained average rank"
        );
        self.ranking = Some(ranking);
        Ok(())
    }

    fn rank(
        &self,
        pipeline_ids: &[PipelineId],
        _dataset_id: DatasetId,
    ) -> Result<Vec<RankedPipeline>> {
        let ranking = self.ranking.as_ref().ok_or(RankingError::NotTrained)?;
        let requested: HashSet<PipelineId> = pipeline_ids.iter().copied().collect();

        Ok(ranking
            .iter()
            .filter(|entry| requested.contains(&entry.pipeline_id))
            .copied()
            .collect())
    }

    fn name(&self) -> String {
        let suffix = match self.mode {
            AveragingMode::Normal => "",
            AveragingMode::Bayesian => "_bayesian_averaging",
        };
        format!("average_rank_{}{suffix}", self.generator.name())
    }
}

impl std::fmt::Debug for AverageRankRanker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AverageRankRanker")
            .field("name", &self.name())
            .field("pipelines", &self.pipeline_ids.len())
            .field("trained", &self.ranking.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Attribute, SparsePair, TrainingTable};
    use crate::error::Error;
    use crate::generator::{
        ExhaustiveGenerator, FeatureSource, GeneratedDataset, ImitationConfig,
        RankingImitationGenerator,
    };
    use crate::storage::{InMemoryFeatureMap, InMemoryPerformanceStore};

    /// Generator that reports a fixed list of pairs.
    struct FixedPairs {
        pairs: Vec<SparsePair>,
    }

    impl FixedPairs {
        fn new(pairs: &[(DatasetId, PipelineId)]) -> Self {
            Self {
                pairs: pairs.iter().map(|&(d, p)| SparsePair::new(d, p)).collect(),
            }
        }
    }

    impl DatasetGenerator for FixedPairs {
        fn initialize(&mut self, _seed: u64) {}

        fn generate_training_dataset(
            &mut self,
            _dataset_ids: &[DatasetId],
            _pipeline_ids: &[PipelineId],
        ) -> Result<GeneratedDataset> {
            Ok(GeneratedDataset {
                table: TrainingTable::new("fixed", Vec::new()),
                pairs: self.pairs.clone(),
            })
        }

        fn name(&self) -> String {
            "fixed".to_string()
        }

        fn attribute_info(&self) -> Option<&[Attribute]> {
            None
        }
    }

    /// Four pipelines on two datasets; pipeline 4 is never measured.
    fn store() -> InMemoryPerformanceStore {
        let mut store = InMemoryPerformanceStore::new();
        for (pipeline, d1, d2) in [(1, 0.9, 0.2), (2, 0.5, 0.8), (3, 0.7, 0.6), (4, -1.0, 0.0)] {
            store.insert(pipeline, 1, d1);
            store.insert(pipeline, 2, d2);
        }
        store
    }

    fn scores(ranking: &[RankedPipeline]) -> Vec<(PipelineId, f64)> {
        ranking.iter().map(|r| (r.pipeline_id, r.score)).collect()
    }

    #[test]
    fn test_rank_before_train() {
        let store = store();
        let ranker = AverageRankRanker::new(&store, Box::new(FixedPairs::new(&[])), AveragingMode::Normal);

        let err = ranker.rank(&[1], 1).unwrap_err();
        assert!(matches!(err, Error::Ranking(RankingError::NotTrained)));
        assert!(ranker.average_ranking().is_none());
    }

    #[test]
    fn test_normal_single_dataset() {
        let store = store();
        let generator = FixedPairs::new(&[(1, 1), (1, 2), (1, 3)]);
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Normal);
        ranker.train(&[1], &[1, 2, 3]).unwrap();

        assert_eq!(
            scores(ranker.average_ranking().unwrap()),
            vec![(1, -1.0), (3, -2.0), (2, -3.0), (4, -4.0)]
        );
    }

    #[test]
    fn test_normal_mean_across_datasets() {
        let store = store();
        // dataset 1 order: 1, 3, 2; dataset 2 order: 2, 3, 1
        let generator = FixedPairs::new(&[(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3)]);
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Normal);
        ranker.train(&[1, 2], &[1, 2, 3]).unwrap();

        assert_eq!(
            scores(ranker.average_ranking().unwrap()),
            vec![(1, -2.0), (2, -2.0), (3, -2.0), (4, -4.0)]
        );
    }

    #[test]
    fn test_pairs_outside_training_datasets_ignored() {
        let store = store();
        let generator = FixedPairs::new(&[(1, 2), (2, 1), (2, 3)]);
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Normal);
        ranker.train(&[1], &[1, 2, 3]).unwrap();

        // only pipeline 2 is in scope on dataset 1
        assert_eq!(
            scores(ranker.average_ranking().unwrap()),
            vec![(2, -1.0), (1, -4.0), (3, -4.0), (4, -4.0)]
        );
    }

    #[test]
    fn test_worst_default_below_real_mean() {
        let mut store = InMemoryPerformanceStore::new()
            .with_performance(1, 1, 0.1)
            .with_performance(2, 1, 0.2)
            .with_performance(3, 1, 0.3)
            .with_performance(4, 1, 0.4);
        // pipeline 1 really ranks 4th; pipeline 5 has no samples
        store.add_pipeline(5);
        let generator = FixedPairs::new(&[(1, 1), (1, 2), (1, 3), (1, 4)]);
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Normal);
        ranker.train(&[1], &[1, 2, 3, 4]).unwrap();

        // default is -(universe size) = -5, strictly below the real -4
        assert_eq!(
            scores(ranker.average_ranking().unwrap()),
            vec![(4, -1.0), (3, -2.0), (2, -3.0), (1, -4.0), (5, -5.0)]
        );
    }

    #[test]
    fn test_worst_default_ties_keep_universe_order() {
        let mut store = InMemoryPerformanceStore::new();
        store.add_pipeline(4);
        store.insert(1, 1, 0.9);
        store.insert(2, 1, 0.5);
        store.insert(3, 1, 0.7);
        // pipeline 1 ranks 1st three times, pipeline 2 ranks 4th in [1, 1, 1, 2]
        let generator = FixedPairs::new(&[(1, 1), (1, 1), (1, 1), (1, 2)]);
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Normal);
        ranker.train(&[1], &[1, 2]).unwrap();

        // pipeline 2's real mean of 4 equals the default -(universe size);
        // the tie keeps universe order, so pipeline 4 stays ahead of 2
        assert_eq!(
            scores(ranker.average_ranking().unwrap()),
            vec![(1, -1.0), (4, -4.0), (2, -4.0), (3, -4.0)]
        );
    }

    #[test]
    fn test_duplicate_pairs_add_samples() {
        let store = store();
        // dataset 1 scope: 3, 1, 3 -> sorted 1, 3, 3
        let generator = FixedPairs::new(&[(1, 3), (1, 1), (1, 3)]);
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Bayesian);
        ranker.train(&[1], &[1, 3]).unwrap();

        // dense ranks on dataset 1: 1 -> 1, 3 -> 2, 2 -> 3, 4 -> 4
        // pipeline 3: dense [2] + sparse [2, 2] -> mean 2
        // pipeline 1: dense [1] + sparse [1] -> mean 1
        assert_eq!(
            scores(ranker.average_ranking().unwrap()),
            vec![(1, -1.0), (3, -2.0), (2, -3.0), (4, -4.0)]
        );
    }

    #[test]
    fn test_bayesian_merges_sparse_into_dense() {
        let store = store();
        // sparse on dataset 2 covers only 1 and 3: 3 -> 1, 1 -> 2
        let generator = FixedPairs::new(&[(2, 1), (2, 3)]);
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Bayesian);
        ranker.train(&[2], &[1, 3]).unwrap();

        // dense ranks on dataset 2: 2 -> 1, 3 -> 2, 1 -> 3, 4 -> 4
        // pipeline 1: [3, 2] -> 2.5; pipeline 3: [2, 1] -> 1.5
        assert_eq!(
            scores(ranker.average_ranking().unwrap()),
            vec![(2, -1.0), (3, -1.5), (1, -2.5), (4, -4.0)]
        );
    }

    #[test]
    fn test_bayesian_without_training_datasets() {
        let store = store();
        let mut ranker = AverageRankRanker::new(&store, Box::new(FixedPairs::new(&[])), AveragingMode::Bayesian);
        ranker.train(&[], &[]).unwrap();

        let ranking = ranker.average_ranking().unwrap();
        assert_eq!(ranking.len(), 4);
        assert!(ranking.iter().all(|r| (r.score + 4.0).abs() < f64::EPSILON));
        assert_eq!(
            ranking.iter().map(|r| r.pipeline_id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
    }

    #[test]
    fn test_rank_filters_and_preserves_order() {
        let store = store();
        let generator = FixedPairs::new(&[(1, 1), (1, 2), (1, 3)]);
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Normal);
        ranker.train(&[1], &[1, 2, 3]).unwrap();

        let ranking = ranker.rank(&[2, 4, 1], 99).unwrap();
        assert_eq!(scores(&ranking), vec![(1, -1.0), (2, -3.0), (4, -4.0)]);

        assert!(ranker.rank(&[42], 1).unwrap().is_empty());
    }

    #[test]
    fn test_rank_ignores_dataset() {
        let store = store();
        let generator = FixedPairs::new(&[(1, 1), (1, 2), (1, 3)]);
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Normal);
        ranker.train(&[1], &[1, 2, 3]).unwrap();

        assert_eq!(ranker.rank(&[1, 2, 3], 1).unwrap(), ranker.rank(&[1, 2, 3], 2).unwrap());
    }

    #[test]
    fn test_retrain_replaces_ranking() {
        let store = store();
        let generator = FixedPairs::new(&[(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3)]);
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Normal);

        ranker.train(&[1], &[1, 2, 3]).unwrap();
        let first = ranker.average_ranking().unwrap().to_vec();
        ranker.train(&[2], &[1, 2, 3]).unwrap();
        let second = ranker.average_ranking().unwrap().to_vec();

        assert_ne!(first, second);
        assert_eq!(second[0].pipeline_id, 2);
    }

    #[test]
    fn test_failed_train_clears_ranking() {
        let store = store();
        let mut pipelines = InMemoryFeatureMap::pipelines(vec![Attribute::numeric("p")]);
        for id in 1..=4 {
            pipelines.insert(id, vec![0.0_f64.into()]).unwrap();
        }
        let mut datasets = InMemoryFeatureMap::datasets(vec![Attribute::numeric("d")]);
        datasets.insert(1, vec![0.0_f64.into()]).unwrap();

        let generator = RankingImitationGenerator::new(
            FeatureSource::new(&store, &pipelines, &datasets),
            ImitationConfig::new(2, 3),
        );
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Normal);
        ranker.initialize(1);
        ranker.train(&[1], &[]).unwrap();
        assert!(ranker.average_ranking().is_some());

        // dataset 99 has no measurements
        let err = ranker.train(&[99], &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::Ranking(RankingError::InsufficientData { dataset_id: 99, .. })
        ));
        assert!(ranker.average_ranking().is_none());
        assert!(matches!(
            ranker.rank(&[1, 2], 1),
            Err(Error::Ranking(RankingError::NotTrained))
        ));
    }

    #[test]
    fn test_train_twice_is_identical() {
        let store = store();
        let mut pipelines = InMemoryFeatureMap::pipelines(vec![Attribute::numeric("p")]);
        for id in 1..=4 {
            pipelines.insert(id, vec![0.0_f64.into()]).unwrap();
        }
        let mut datasets = InMemoryFeatureMap::datasets(vec![Attribute::numeric("d")]);
        datasets.insert(1, vec![0.0_f64.into()]).unwrap();
        datasets.insert(2, vec![0.0_f64.into()]).unwrap();

        let generator = ExhaustiveGenerator::new(FeatureSource::new(&store, &pipelines, &datasets));
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Normal);

        ranker.train(&[1, 2], &[1, 2, 3, 4]).unwrap();
        let first = ranker.average_ranking().unwrap().to_vec();
        ranker.train(&[1, 2], &[1, 2, 3, 4]).unwrap();
        assert_eq!(first, ranker.average_ranking().unwrap());
    }

    #[test]
    fn test_names() {
        let store = store();
        let normal = AverageRankRanker::new(&store, Box::new(FixedPairs::new(&[])), AveragingMode::Normal);
        assert_eq!(normal.name(), "average_rank_fixed");

        let bayesian = AverageRankRanker::new(&store, Box::new(FixedPairs::new(&[])), AveragingMode::Bayesian);
        assert_eq!(bayesian.name(), "average_rank_fixed_bayesian_averaging");
        assert_eq!(bayesian.mode(), AveragingMode::Bayesian);
        assert_eq!(bayesian.generator().name(), "fixed");
    }

    #[test]
    fn test_initialize_seeds_generator() {
        let store = store();
        let mut pipelines = InMemoryFeatureMap::pipelines(vec![Attribute::numeric("p")]);
        for id in 1..=4 {
            pipelines.insert(id, vec![0.0_f64.into()]).unwrap();
        }
        let mut datasets = InMemoryFeatureMap::datasets(vec![Attribute::numeric("d")]);
        datasets.insert(1, vec![0.0_f64.into()]).unwrap();

        let generator = RankingImitationGenerator::new(
            FeatureSource::new(&store, &pipelines, &datasets),
            ImitationConfig::new(2, 3),
        );
        let mut ranker = AverageRankRanker::new(&store, Box::new(generator), AveragingMode::Normal);

        let err = ranker.train(&[1], &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::Ranking(RankingError::GeneratorNotInitialized { .. })
        ));

        ranker.initialize(5);
        ranker.train(&[1], &[]).unwrap();
        assert!(ranker.average_ranking().is_some());
    }
}
