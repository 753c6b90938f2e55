//! Parallel utilities with feature-gated implementations
//!
//! Batch elements run on rayon when the `rayon` feature is enabled, with a
//! sequential fallback otherwise. The split granularity comes from the
//! kernel's cost estimate.

use crate::config::BatchConfig;
use crate::cost::batch_cost;

/// Check if parallel processing is available
#[cfg(feature = "rayon")]
pub fn is_parallel_available() -> bool {
    true
}

/// Check if parallel processing is available
#[cfg(not(feature = "rayon"))]
pub fn is_parallel_available() -> bool {
    false
}

/// Minimum number of batch elements one task should take.
///
/// Cheap elements are grouped until a task reaches `min_task_cost`; elements
/// at least that expensive get a task each. Always within `1..=max(units, 1)`.
pub fn min_elements_per_task(cost_per_unit: i64, min_task_cost: i64, units: usize) -> usize {
    let upper = units.max(1);
    if cost_per_unit <= 0 {
        return upper;
    }
    let min_task_cost = min_task_cost.max(1);
    let per_task = min_task_cost / cost_per_unit + i64::from(min_task_cost % cost_per_unit != 0);
    usize::try_from(per_task).unwrap_or(upper).clamp(1, upper)
}

/// Whether a batch is worth spreading over the thread pool
pub fn should_run_parallel(config: &BatchConfig, cost_per_unit: i64, units: usize) -> bool {
    config.parallel
        && is_parallel_available()
        && units > 1
        && batch_cost(cost_per_unit, units) >= config.min_task_cost
}

/// Parallel map over owned items with index, `min_len` items per task at least
#[cfg(feature = "rayon")]
pub fn parallel_map_indexed_owned<T, U, F>(items: Vec<T>, min_len: usize, f: F) -> Vec<U>
where
    T: Send,
    U: Send,
    F: Fn(usize, T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    items
        .into_par_iter()
        .enumerate()
        .with_min_len(min_len)
        .map(|(i, item)| f(i, item))
        .collect()
}

/// Sequential map with index (fallback)
#[cfg(not(feature = "rayon"))]
pub fn parallel_map_indexed_owned<T, U, F>(items: Vec<T>, _min_len: usize, f: F) -> Vec<U>
where
    F: Fn(usize, T) -> U,
{
    sequential_map_indexed_owned(items, f)
}

/// Sequential map over owned items with index
pub fn sequential_map_indexed_owned<T, U, F>(items: Vec<T>, f: F) -> Vec<U>
where
    F: Fn(usize, T) -> U,
{
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| f(i, item))
        .collect()
}
