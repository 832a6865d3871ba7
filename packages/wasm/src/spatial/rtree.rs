//! R-tree based spatial index using the rstar crate.
//!
//! Provides O(log n) spatial queries for:
//! - Nearest neighbor (hit testing)
//! - Distance to the nearest indexed point (collision checks)
//! - Point-in-radius

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::geometry::Position;
use crate::graph::NodeId;

/// A point in the spatial index with associated node ID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePoint {
    /// The node identifier.
    pub id: NodeId,
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl NodePoint {
    /// Create a new NodePoint.
    pub fn new(id: NodeId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

impl RTreeObject for NodePoint {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for NodePoint {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        (self.x - point[0]).abs() < f32::EPSILON && (self.y - point[1]).abs() < f32::EPSILON
    }
}

/// Spatial index for graph nodes.
///
/// Uses an R*-tree for efficient spatial queries.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<NodePoint>,
}

impl SpatialIndex {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Insert a node into the index.
    pub fn insert(&mut self, id: NodeId, at: Position) {
        self.tree.insert(NodePoint::new(id, at.x, at.y));
    }

    /// Find the nearest node to a point.
    pub fn nearest(&self, at: Position) -> Option<NodeId> {
        self.tree.nearest_neighbor(&[at.x, at.y]).map(|point| point.id)
    }

    /// Squared distance from `at` to the closest indexed point.
    ///
    /// Returns `f32::INFINITY` for an empty index.
    pub fn nearest_distance_sq(&self, at: Position) -> f32 {
        self.tree
            .nearest_neighbor(&[at.x, at.y])
            .map(|point| point.distance_2(&[at.x, at.y]))
            .unwrap_or(f32::INFINITY)
    }

    /// Rebuild the index from a list of (id, position) pairs.
    ///
    /// This is more efficient than incremental inserts for bulk updates.
    pub fn rebuild(&mut self, points: &[(NodeId, Position)]) {
        let node_points: Vec<_> = points
            .iter()
            .map(|&(id, at)| NodePoint::new(id, at.x, at.y))
            .collect();

        self.tree = RTree::bulk_load(node_points);
    }

    /// Clear all nodes from the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_insert_and_nearest() {
        let mut index = SpatialIndex::new();
        index.insert(NodeId(0), p(0.0, 0.0));
        index.insert(NodeId(1), p(10.0, 10.0));
        index.insert(NodeId(2), p(5.0, 5.0));

        assert_eq!(index.nearest(p(0.0, 0.0)), Some(NodeId(0)));
        assert_eq!(index.nearest(p(6.0, 6.0)), Some(NodeId(2)));
        assert_eq!(index.nearest(p(11.0, 11.0)), Some(NodeId(1)));
    }

    #[test]
    fn test_nearest_distance_sq() {
        let mut index = SpatialIndex::new();
        assert_eq!(index.nearest_distance_sq(p(0.0, 0.0)), f32::INFINITY);

        index.insert(NodeId(0), p(3.0, 4.0));
        assert_eq!(index.nearest_distance_sq(p(0.0, 0.0)), 25.0);
    }

    #[test]
    fn test_rebuild_and_clear() {
        let mut index = SpatialIndex::new();
        index.insert(NodeId(0), p(0.0, 0.0));

        index.rebuild(&[
            (NodeId(1), p(1.0, 1.0)),
            (NodeId(2), p(2.0, 2.0)),
            (NodeId(3), p(3.0, 3.0)),
        ]);
        assert_eq!(index.nearest(p(0.0, 0.0)), Some(NodeId(1)));
        assert_eq!(index.nearest_distance_sq(p(3.0, 3.0)), 0.0);

        index.clear();
        assert_eq!(index.nearest(p(0.0, 0.0)), None);
    }
}
