//! **gridpath-core**: geometry primitives shared across the *gridpath*
//! crates.
//!
//! Grid cells are addressed with integer [`Point`]s (`x` is the column, `y`
//! the row), map bounds with half-open [`Range`]s, and positions in the
//! host application's world space with [`WorldPos`].

pub mod geom;

pub use geom::{Point, Range, RangeIter, WorldPos};
