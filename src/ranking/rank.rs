//! Per-dataset rank computation.
//!
//! Pipelines are ordered by performance, best first, with a stable sort so
//! equal performances keep their input order. A pipeline's rank is its
//! 1-based position in that order. When the input lists a pipeline more
//! than once, every occurrence receives the rank of its first position.

use crate::core::{DatasetId, PipelineId, RankStatistics};
use crate::storage::PerformanceStore;
use std::collections::HashMap;

/// Rank statistics keyed by pipeline.
pub type StatisticsMap = HashMap<PipelineId, RankStatistics>;

/// Sorts pipelines by their performance on a dataset, best first.
///
/// Unmeasured pipelines go last.
#[must_use]
pub fn sort_by_performance(
    store: &dyn PerformanceStore,
    pipeline_ids: &[PipelineId],
    dataset_id: DatasetId,
) -> Vec<PipelineId> {
    let mut scored: Vec<_> = pipeline_ids
        .iter()
        .map(|&id| (id, store.performance(id, dataset_id)))
        .collect();
    scored.sort_by(|a, b| a.1.cmp_descending(b.1));
    scored.into_iter().map(|(id, _)| id).collect()
}

/// Computes the rank of every entry of `pipeline_ids` on a dataset.
///
/// The result is aligned with the input.
///
/// # Examples
///
/// ```
/// use pipeline_rank::ranking::rank::rank_on_dataset;
/// use pipeline_rank::storage::InMemoryPerformanceStore;
///
/// let store = InMemoryPerformanceStore::new()
///     .with_performance(1, 7, 0.9)
///     .with_performance(2, 7, 0.5)
///     .with_performance(3, 7, 0.7);
///
/// let ranks = rank_on_dataset(&store, &[1, 2, 3], 7);
/// assert_eq!(ranks, vec![(1, 1), (2, 3), (3, 2)]);
/// ```
#[must_use]
pub fn rank_on_dataset(
    store: &dyn PerformanceStore,
    pipeline_ids: &[PipelineId],
    dataset_id: DatasetId,
) -> Vec<(PipelineId, usize)> {
    let sorted = sort_by_performance(store, pipeline_ids, dataset_id);

    let mut first_position: HashMap<PipelineId, usize> = HashMap::with_capacity(sorted.len());
    for (position, id) in sorted.into_iter().enumerate() {
        first_position.entry(id).or_insert(position + 1);
    }

    pipeline_ids
        .iter()
        .map(|id| (*id, first_position.get(id).copied().unwrap_or_default()))
        .collect()
}

/// Adds one rank sample per entry of `pipeline_ids` on `dataset_id`.
#[allow(clippy::cast_precision_loss)]
pub fn accumulate_ranks(
    statistics: &mut StatisticsMap,
    store: &dyn PerformanceStore,
    pipeline_ids: &[PipelineId],
    dataset_id: DatasetId,
) {
    for (id, rank) in rank_on_dataset(store, pipeline_ids, dataset_id) {
        statistics.entry(id).or_default().add(rank as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryPerformanceStore;
    use proptest::prelude::*;

    fn store() -> InMemoryPerformanceStore {
        InMemoryPerformanceStore::new()
            .with_performance(1, 1, 0.9)
            .with_performance(2, 1, 0.5)
            .with_performance(3, 1, 0.7)
            .with_performance(4, 1, -1.0)
            .with_performance(5, 1, 0.5)
    }

    #[test]
    fn test_sort_by_performance() {
        let store = store();
        assert_eq!(sort_by_performance(&store, &[1, 2, 3], 1), vec![1, 3, 2]);
    }

    #[test]
    fn test_unmeasured_last() {
        let store = store();
        assert_eq!(sort_by_performance(&store, &[4, 2, 1], 1), vec![1, 2, 4]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let store = store();
        assert_eq!(
            rank_on_dataset(&store, &[5, 2], 1),
            vec![(5, 1), (2, 2)]
        );
        assert_eq!(
            rank_on_dataset(&store, &[2, 5], 1),
            vec![(2, 1), (5, 2)]
        );
    }

    #[test]
    fn test_duplicates_share_first_position() {
        let store = store();
        // sorted: 1, 3, 3, 2 -> 3 is first seen at position 2
        let ranks = rank_on_dataset(&store, &[3, 1, 3, 2], 1);
        assert_eq!(ranks, vec![(3, 2), (1, 1), (3, 2), (2, 4)]);
    }

    #[test]
    fn test_accumulate_ranks() {
        let store = store()
            .with_performance(1, 2, 0.1)
            .with_performance(3, 2, 0.2);
        let mut stats = StatisticsMap::new();
        accumulate_ranks(&mut stats, &store, &[1, 3], 1);
        accumulate_ranks(&mut stats, &store, &[1, 3], 2);

        assert_eq!(stats[&1].values(), &[1.0, 2.0]);
        assert_eq!(stats[&3].values(), &[2.0, 1.0]);
    }

    #[test]
    fn test_empty_input() {
        let store = store();
        assert!(rank_on_dataset(&store, &[], 1).is_empty());
    }

    proptest! {
        #[test]
        fn ranks_form_permutation(values in prop::collection::vec(0.001f64..1.0, 1..40)) {
            let mut store = InMemoryPerformanceStore::new();
            let ids: Vec<PipelineId> = (0..values.len() as i64).collect();
            for (&id, &value) in ids.iter().zip(&values) {
                store.insert(id, 0, value);
            }

            let mut ranks: Vec<usize> = rank_on_dataset(&store, &ids, 0)
                .into_iter()
                .map(|(_, rank)| rank)
                .collect();
            ranks.sort_unstable();
            let expected: Vec<usize> = (1..=values.len()).collect();
            prop_assert_eq!(ranks, expected);
        }

        #[test]
        fn better_performance_never_ranks_worse(values in prop::collection::vec(0.001f64..1.0, 2..30)) {
            let mut store = InMemoryPerformanceStore::new();
            let ids: Vec<PipelineId> = (0..values.len() as i64).collect();
            for (&id, &value) in ids.iter().zip(&values) {
                store.insert(id, 0, value);
            }

            let ranks = rank_on_dataset(&store, &ids, 0);
            for (i, &(_, rank_i)) in ranks.iter().enumerate() {
                for (j, &(_, rank_j)) in ranks.iter().enumerate() {
                    if values[i] > values[j] {
                        prop_assert!(rank_i < rank_j);
                    }
                }
            }
        }
    }
}
