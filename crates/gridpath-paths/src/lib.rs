//! Time-sliced path planning on 2D grids.
//!
//! The engine answers start → goal queries on a grid of walls and floor
//! cells, with 8-way movement that never cuts a wall corner:
//!
//! - **A\*** over a bucketed open list, resumable one expansion at a time
//!   ([`AStarSearch`])
//! - **Floyd–Warshall** all-pairs table for instant lookups on small maps
//!   ([`AllPairsTable`])
//! - **Post-processing**: rubber banding and Catmull-Rom smoothing
//!   ([`rubber_band`], [`catmull_rom`])
//!
//! [`PathPlanner`] ties them together: feed it map changes with
//! [`PathPlanner::map_changed`] and requests with
//! [`PathPlanner::compute_path`].
//!
//! # Collaborator traits
//!
//! | Trait | Used for |
//! |---|---|
//! | [`Terrain`] | building the neighbor graph |
//! | [`WorldMap`] : [`Terrain`] | converting request and path positions |
//! | [`ColorSink`] | observing open and closed cells while searching |

mod astar;
mod bucket;
mod config;
mod error;
mod floyd;
mod heuristic;
mod neighbors;
mod planner;
mod request;
mod smooth;
mod traits;

pub use astar::{AStarSearch, NodeStatus, SearchState};
pub use bucket::BucketQueue;
pub use config::{DIAGONAL_COST, SearchConfig};
pub use error::{InvalidReason, PathError};
pub use floyd::AllPairsTable;
pub use heuristic::Heuristic;
pub use neighbors::{Dir, DirMask, NeighborGraph};
pub use planner::PathPlanner;
pub use request::{Method, PathRequest, PathResult, PathSettings};
pub use smooth::{catmull_rom, rubber_band, subdivide};
pub use traits::{ColorSink, DebugColor, NoColors, Terrain, WorldMap};
