//! Cost estimation for the batch split
//!
//! The estimate only drives how many batch elements are grouped into one
//! parallel task. It never affects results.

/// Row count above which the cost is capped instead of computed
pub const MAX_COSTED_ROWS: i64 = 1 << 20;

/// Cost returned for matrices larger than [`MAX_COSTED_ROWS`]
pub const COST_CAP: i64 = i32::MAX as i64;

/// Estimated cost of solving an `n x n` system with `k` right-hand sides.
///
/// Proportional to `n^2 * (n + k)`: `O(n^3)` for the factorization plus
/// `O(n^2 k)` for the substitutions.
pub fn solve_cost(rows: usize, rhss: usize) -> i64 {
    let rows = i64::try_from(rows).unwrap_or(i64::MAX);
    if rows > MAX_COSTED_ROWS {
        return COST_CAP;
    }
    let rhss = i64::try_from(rhss).unwrap_or(i64::MAX);
    // rows^2 <= 2^40, so only a huge rhs count can still overflow
    rows.saturating_mul(rows)
        .saturating_mul(rows.saturating_add(rhss))
}

/// Total cost of a batch, saturating instead of wrapping
pub fn batch_cost(cost_per_unit: i64, units: usize) -> i64 {
    cost_per_unit.saturating_mul(i64::try_from(units).unwrap_or(i64::MAX))
}
