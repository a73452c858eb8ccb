//! Approximate min-priority queue over discretized costs.
//!
//! Costs are binned into buckets `resolution` per unit of cost. Inserting and
//! decreasing a key are O(1) plus a scan of one bucket; extracting scans the
//! cheapest bucket for its true minimum. Ordering across buckets is exact,
//! so the queue behaves like a min-heap whose ties within one bucket are
//! resolved by a linear scan.
//!
//! When the cheapest bucket empties, the next one is found through a coarse
//! occupancy index: one live counter per group of consecutive buckets, so
//! runs of empty buckets are skipped a group at a time.

use crate::config::SearchConfig;
use crate::error::PathError;

/// Bucket count allowed by [`BucketQueue::new`]: costs up to 2^18 at the
/// default resolution.
pub const DEFAULT_MAX_BUCKETS: usize = 1 << 20;

#[derive(Debug, Clone, Copy)]
struct Entry<T> {
    item: T,
    cost: f32,
}

/// Bucketed priority queue keyed by `f32` cost.
#[derive(Debug, Clone)]
pub struct BucketQueue<T> {
    buckets: Vec<Vec<Entry<T>>>,
    /// Live entries per group of `group_size` buckets.
    groups: Vec<u32>,
    cheapest: Option<usize>,
    len: usize,
    resolution: f32,
    group_size: usize,
    capacity: Option<usize>,
    max_buckets: usize,
}

impl<T: Copy + PartialEq> BucketQueue<T> {
    /// Create an empty queue. `group_size` is clamped to at least 1.
    pub fn new(resolution: f32, group_size: usize, capacity: Option<usize>) -> Self {
        Self {
            buckets: Vec::new(),
            groups: Vec::new(),
            cheapest: None,
            len: 0,
            resolution,
            group_size: group_size.max(1),
            capacity,
            max_buckets: DEFAULT_MAX_BUCKETS,
        }
    }

    /// Set the number of buckets the queue may allocate. Costs that land
    /// past it are refused with [`PathError::BucketLimit`].
    pub fn with_max_buckets(mut self, max_buckets: usize) -> Self {
        self.max_buckets = max_buckets;
        self
    }

    /// Create a queue using the bucket settings of `config`.
    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(
            config.bucket_resolution,
            config.bucket_group_size,
            config.bucket_capacity,
        )
        .with_max_buckets(config.max_buckets)
    }

    /// Bucket index of `cost`: `floor(cost × resolution)`, clamped at 0 and
    /// saturating at `usize::MAX`.
    #[inline]
    pub fn bucket_of(&self, cost: f32) -> usize {
        (cost * self.resolution).floor().max(0.0) as usize
    }

    /// Index of the cheapest nonempty bucket.
    #[inline]
    pub fn cheapest_bucket(&self) -> Option<usize> {
        self.cheapest
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every entry. Bucket storage is kept for reuse.
    pub fn clear(&mut self) {
        for b in &mut self.buckets {
            b.clear();
        }
        for g in &mut self.groups {
            *g = 0;
        }
        self.cheapest = None;
        self.len = 0;
    }

    /// Add `item` with `cost`.
    ///
    /// Fails with [`PathError::QueueOverflow`] if the queue has a fixed
    /// capacity and the target bucket is full, and with
    /// [`PathError::BucketLimit`] if `cost` maps past the last allowed bucket.
    pub fn insert(&mut self, item: T, cost: f32) -> Result<(), PathError> {
        let b = self.bucket_of(cost);
        if b >= self.max_buckets {
            log::warn!("cost {cost} falls in bucket {b}, past the limit of {}", self.max_buckets);
            return Err(PathError::BucketLimit {
                bucket: b,
                limit: self.max_buckets,
            });
        }
        if b >= self.buckets.len() {
            self.buckets.resize_with(b + 1, Vec::new);
            self.groups.resize(b / self.group_size + 1, 0);
        }
        if let Some(capacity) = self.capacity {
            if self.buckets[b].len() >= capacity {
                log::warn!("bucket {b} overflowed at capacity {capacity}");
                return Err(PathError::QueueOverflow { bucket: b, capacity });
            }
        }
        self.buckets[b].push(Entry { item, cost });
        self.groups[b / self.group_size] += 1;
        self.len += 1;
        if self.cheapest.is_none_or(|c| b < c) {
            self.cheapest = Some(b);
        }
        Ok(())
    }

    /// Remove and return the lowest-cost entry of the cheapest bucket.
    ///
    /// Among exact ties the entry found first wins.
    pub fn extract_min(&mut self) -> Option<(T, f32)> {
        let b = self.cheapest?;
        let bucket = &self.buckets[b];
        let mut best = 0;
        for (i, e) in bucket.iter().enumerate().skip(1) {
            if e.cost < bucket[best].cost {
                best = i;
            }
        }
        let e = self.remove_at(b, best);
        Some((e.item, e.cost))
    }

    /// Move `item` from the bucket of `old_cost` to the bucket of
    /// `new_cost`. Returns `Ok(false)` if the item was not in the queue, in
    /// which case nothing is inserted.
    pub fn decrease_key(&mut self, item: T, old_cost: f32, new_cost: f32) -> Result<bool, PathError> {
        let b = self.bucket_of(old_cost);
        let Some(pos) = self
            .buckets
            .get(b)
            .and_then(|bucket| bucket.iter().position(|e| e.item == item))
        else {
            return Ok(false);
        };
        let b_new = self.bucket_of(new_cost);
        if b_new == b {
            self.buckets[b][pos].cost = new_cost;
            return Ok(true);
        }
        self.remove_at(b, pos);
        self.insert(item, new_cost)?;
        Ok(true)
    }

    fn remove_at(&mut self, b: usize, pos: usize) -> Entry<T> {
        let e = self.buckets[b].swap_remove(pos);
        self.groups[b / self.group_size] -= 1;
        self.len -= 1;
        if self.cheapest == Some(b) && self.buckets[b].is_empty() {
            self.cheapest = self.next_nonempty(b);
        }
        e
    }

    /// First nonempty bucket at or after `from`, skipping empty groups.
    fn next_nonempty(&self, from: usize) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let first_group = from / self.group_size;
        for (g, &count) in self.groups.iter().enumerate().skip(first_group) {
            if count == 0 {
                continue;
            }
            let lo = (g * self.group_size).max(from);
            let hi = ((g + 1) * self.group_size).min(self.buckets.len());
            if let Some(b) = (lo..hi).find(|&b| !self.buckets[b].is_empty()) {
                return Some(b);
            }
        }
        None
    }
}
