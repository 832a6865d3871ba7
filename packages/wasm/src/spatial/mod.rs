//! Spatial indexing for O(log n) hit testing and collision queries.
//!
//! This module provides an R-tree based spatial index used to find the node
//! under a click and to keep displaced nodes apart during a focus cycle.

mod rtree;

pub use rtree::SpatialIndex;
