/// Tuning knobs for a [`PathPlanner`](crate::PathPlanner).
///
/// With the `serde` feature, missing fields fall back to their defaults so a
/// partial config file is enough.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    /// Buckets per unit of cost. A resolution of 4 gives buckets 0.25 wide.
    pub bucket_resolution: f32,
    /// Number of consecutive buckets tracked by one occupancy counter.
    pub bucket_group_size: usize,
    /// Maximum entries per bucket. `None` lets buckets grow.
    pub bucket_capacity: Option<usize>,
    /// Number of buckets the open list may allocate. Costs past
    /// `max_buckets / bucket_resolution` end the search with
    /// [`PathError::BucketLimit`](crate::PathError::BucketLimit).
    pub max_buckets: usize,
    /// Cost of a diagonal step. Kept at 1.41 rather than √2.
    pub diagonal_cost: f32,
    /// Build the all-pairs table on every map change. The build is
    /// O(cells³) in time and O(cells²) in memory.
    pub precompute_all_pairs: bool,
}

use crate::bucket::DEFAULT_MAX_BUCKETS;

/// Cost of a diagonal step.
pub const DIAGONAL_COST: f32 = 1.41;

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            bucket_resolution: 4.0,
            bucket_group_size: 20,
            bucket_capacity: None,
            max_buckets: DEFAULT_MAX_BUCKETS,
            diagonal_cost: DIAGONAL_COST,
            precompute_all_pairs: true,
        }
    }
}
