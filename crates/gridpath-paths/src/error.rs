use std::fmt;

use gridpath_core::Point;

/// Why a request endpoint was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The cell lies outside the map.
    OutOfBounds,
    /// The cell is a wall.
    Wall,
    /// The heuristic weight is negative, infinite or NaN. The reported
    /// position is the start cell.
    Weight,
}

/// Errors surfaced by the search engine.
///
/// "No path exists" and "not finished yet" are not errors: they are reported
/// through [`PathResult`](crate::PathResult) and
/// [`SearchState`](crate::SearchState).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A start or goal cell is off the map or on a wall. Rejected before any
    /// search state is touched.
    InvalidRequest { pos: Point, reason: InvalidReason },
    /// A fixed-capacity bucket is full. The bucket capacity is too small for
    /// this map and heuristic.
    QueueOverflow { bucket: usize, capacity: usize },
    /// A cost fell past the last bucket the queue may allocate. The weight
    /// or the map is too large for the configured `max_buckets`.
    BucketLimit { bucket: usize, limit: usize },
    /// A continuation was requested but no search is in progress.
    StaleCall,
    /// The all-pairs table was requested but has not been built.
    TableUnavailable,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest { pos, reason } => match reason {
                InvalidReason::OutOfBounds => write!(f, "invalid request: {pos} is off the map"),
                InvalidReason::Wall => write!(f, "invalid request: {pos} is a wall"),
                InvalidReason::Weight => write!(
                    f,
                    "invalid request: heuristic weight must be finite and non-negative"
                ),
            },
            Self::QueueOverflow { bucket, capacity } => write!(
                f,
                "open list overflow: bucket {bucket} already holds {capacity} entries"
            ),
            Self::BucketLimit { bucket, limit } => {
                write!(f, "open list cost out of range: bucket {bucket} is past the limit of {limit}")
            }
            Self::StaleCall => write!(f, "no search in progress and no new request"),
            Self::TableUnavailable => write!(f, "all-pairs table has not been built"),
        }
    }
}

impl std::error::Error for PathError {}
