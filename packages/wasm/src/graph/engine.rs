//! GraphEngine - Core graph data structure.
//!
//! The GraphEngine stores the graph topology using petgraph's StableGraph
//! (undirected: edge direction never affects placement) and maintains SoA
//! (Structure of Arrays) buffers for positions and sizes so the whole layout
//! can be handed to a renderer in one go.

use petgraph::Undirected;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::Bfs;
use std::collections::HashMap;

use super::edge::{EdgeData, EdgeId, EdgeOrigin};
use super::node::{NodeData, NodeId, NodeState};
use crate::geometry::{Position, PositionMap};
use crate::spatial::SpatialIndex;

/// Extra pixels around a node that still count as a hit.
pub const HIT_PADDING: f32 = 4.0;

/// The core graph engine.
///
/// This struct manages:
/// - Graph topology via petgraph
/// - Position/size buffers in SoA layout
/// - Node state (focused, locked, pinned)
/// - Spatial index for hit testing
/// - ID mapping between host string ids and slots
pub struct GraphEngine {
    /// The underlying graph structure.
    graph: StableGraph<NodeId, EdgeId, Undirected>,

    /// Slot -> petgraph index.
    node_index: Vec<NodeIndex>,

    /// Host id -> slot.
    key_to_node: HashMap<String, NodeId>,

    /// Node payloads, one per slot.
    nodes: Vec<NodeData>,

    /// Edge payloads, one per edge slot.
    edges: Vec<EdgeData>,

    /// X positions (SoA layout)
    pos_x: Vec<f32>,

    /// Y positions (SoA layout)
    pos_y: Vec<f32>,

    /// Current size field. Differs from `NodeData::base_size` while a node is
    /// focused or after it was shrunk for another node's focus.
    sizes: Vec<f32>,

    /// Node states (focused, locked, pinned)
    states: Vec<NodeState>,

    /// Spatial index for hit testing
    spatial: SpatialIndex,

    /// Whether the spatial index needs rebuilding
    spatial_dirty: bool,
}

impl GraphEngine {
    /// Create a new empty graph engine.
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Create a graph engine with pre-allocated capacity.
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            graph: StableGraph::with_capacity(node_capacity, edge_capacity),
            node_index: Vec::with_capacity(node_capacity),
            key_to_node: HashMap::with_capacity(node_capacity),
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            pos_x: Vec::with_capacity(node_capacity),
            pos_y: Vec::with_capacity(node_capacity),
            sizes: Vec::with_capacity(node_capacity),
            states: Vec::with_capacity(node_capacity),
            spatial: SpatialIndex::new(),
            spatial_dirty: false,
        }
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node at the specified position.
    ///
    /// Returns `None` when a node with the same host id already exists.
    pub fn add_node(&mut self, data: NodeData, at: Position) -> Option<NodeId> {
        if self.key_to_node.contains_key(&data.key) {
            return None;
        }

        let id = NodeId(self.nodes.len() as u32);
        let index = self.graph.add_node(id);
        self.node_index.push(index);
        self.key_to_node.insert(data.key.clone(), id);

        self.pos_x.push(at.x);
        self.pos_y.push(at.y);
        self.sizes.push(data.base_size);
        self.states.push(NodeState::new());
        self.nodes.push(data);

        self.spatial_dirty = true;
        Some(id)
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all node slots in load order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Resolve a host id to its slot.
    pub fn lookup(&self, key: &str) -> Option<NodeId> {
        self.key_to_node.get(key).copied()
    }

    /// Get a node's payload.
    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.index())
    }

    /// All node payloads in slot order.
    pub fn nodes(&self) -> &[NodeData] {
        &self.nodes
    }

    /// Get a node's position.
    pub fn position(&self, id: NodeId) -> Option<Position> {
        let i = id.index();
        (i < self.pos_x.len()).then(|| Position::new(self.pos_x[i], self.pos_y[i]))
    }

    /// Set a node's position.
    pub fn set_position(&mut self, id: NodeId, at: Position) {
        let i = id.index();
        if i < self.pos_x.len() {
            self.pos_x[i] = at.x;
            self.pos_y[i] = at.y;
            self.spatial_dirty = true;
        }
    }

    /// Get a node's current size field.
    pub fn size(&self, id: NodeId) -> Option<f32> {
        self.sizes.get(id.index()).copied()
    }

    /// Set a node's current size field.
    pub fn set_size(&mut self, id: NodeId, size: f32) {
        if let Some(slot) = self.sizes.get_mut(id.index()) {
            *slot = size;
        }
    }

    /// Get a node's state flags.
    pub fn state(&self, id: NodeId) -> NodeState {
        self.states.get(id.index()).copied().unwrap_or_default()
    }

    /// Mutable access to a node's state flags.
    pub fn state_mut(&mut self, id: NodeId) -> Option<&mut NodeState> {
        self.states.get_mut(id.index())
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Add an edge between two nodes identified by host id.
    ///
    /// Returns `None` if either endpoint does not exist.
    pub fn add_edge(
        &mut self,
        key: String,
        source: &str,
        target: &str,
        origin: EdgeOrigin,
    ) -> Option<EdgeId> {
        let source = self.lookup(source)?;
        let target = self.lookup(target)?;

        let id = EdgeId(self.edges.len() as u32);
        self.graph
            .add_edge(self.node_index[source.index()], self.node_index[target.index()], id);
        self.edges.push(EdgeData {
            key,
            source,
            target,
            origin,
        });
        Some(id)
    }

    /// Get the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All edge payloads in insertion order.
    pub fn edges(&self) -> &[EdgeData] {
        &self.edges
    }

    /// Whether every node is reachable from the first one.
    ///
    /// An empty graph counts as connected.
    pub fn is_connected(&self) -> bool {
        let Some(&start) = self.node_index.first() else {
            return true;
        };
        let mut bfs = Bfs::new(&self.graph, start);
        let mut reached = 0;
        while bfs.next(&self.graph).is_some() {
            reached += 1;
        }
        reached == self.graph.node_count()
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    /// Snapshot of every node position keyed by host id.
    pub fn position_map(&self) -> PositionMap {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.key.clone(), Position::new(self.pos_x[i], self.pos_y[i])))
            .collect()
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the node whose circle contains the point.
    ///
    /// A point hits a node when it lies within half the node's current size
    /// plus [`HIT_PADDING`] of its center.
    pub fn node_at(&mut self, at: Position) -> Option<NodeId> {
        self.ensure_spatial_index_up_to_date();
        let id = self.spatial.nearest(at)?;
        let center = self.position(id)?;
        let reach = self.size(id).unwrap_or(0.0) / 2.0 + HIT_PADDING;
        (center.distance_sq(at) <= reach * reach).then_some(id)
    }

    /// Rebuild the spatial index.
    pub fn rebuild_spatial_index(&mut self) {
        let points: Vec<_> = self
            .node_ids()
            .map(|id| (id, Position::new(self.pos_x[id.index()], self.pos_y[id.index()])))
            .collect();

        self.spatial.rebuild(&points);
        self.spatial_dirty = false;
    }

    fn ensure_spatial_index_up_to_date(&mut self) {
        if self.spatial_dirty {
            self.rebuild_spatial_index();
        }
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Clear all nodes and edges, resetting the engine to its initial state.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.node_index.clear();
        self.key_to_node.clear();
        self.nodes.clear();
        self.edges.clear();
        self.pos_x.clear();
        self.pos_y.clear();
        self.sizes.clear();
        self.states.clear();
        self.spatial.clear();
        self.spatial_dirty = false;
    }
}

impl Default for GraphEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(key: &str, size: f32) -> NodeData {
        NodeData {
            key: key.to_string(),
            label: key.to_uppercase(),
            url: None,
            color: "#111827".to_string(),
            raw_size: size,
            base_size: size,
        }
    }

    fn engine_with(keys: &[&str]) -> GraphEngine {
        let mut engine = GraphEngine::new();
        for (i, key) in keys.iter().enumerate() {
            engine.add_node(node(key, 16.0), Position::new(i as f32 * 100.0, 0.0));
        }
        engine
    }

    #[test]
    fn test_add_node() {
        let mut engine = GraphEngine::new();
        let id = engine.add_node(node("a", 16.0), Position::new(10.0, 20.0)).unwrap();

        assert_eq!(engine.node_count(), 1);
        assert_eq!(engine.position(id), Some(Position::new(10.0, 20.0)));
        assert_eq!(engine.size(id), Some(16.0));
        assert_eq!(engine.lookup("a"), Some(id));
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut engine = engine_with(&["a"]);
        assert_eq!(engine.add_node(node("a", 18.0), Position::default()), None);
        assert_eq!(engine.node_count(), 1);
    }

    #[test]
    fn test_add_edge_requires_both_endpoints() {
        let mut engine = engine_with(&["a", "b"]);

        assert!(engine.add_edge("a-b".into(), "a", "b", EdgeOrigin::Supplied).is_some());
        assert!(engine.add_edge("a-z".into(), "a", "z", EdgeOrigin::Supplied).is_none());
        assert_eq!(engine.edge_count(), 1);
    }

    #[test]
    fn test_is_connected() {
        let mut engine = engine_with(&["a", "b", "c"]);
        engine.add_edge("a-b".into(), "a", "b", EdgeOrigin::Ring);
        assert!(!engine.is_connected());

        engine.add_edge("b-c".into(), "b", "c", EdgeOrigin::Ring);
        assert!(engine.is_connected());

        assert!(GraphEngine::new().is_connected());
    }

    #[test]
    fn test_node_at_respects_size() {
        let mut engine = engine_with(&["a", "b"]);
        let a = engine.lookup("a").unwrap();

        // Radius 8 plus padding 4
        assert_eq!(engine.node_at(Position::new(11.0, 0.0)), Some(a));
        assert_eq!(engine.node_at(Position::new(13.0, 0.0)), None);

        engine.set_size(a, 40.0);
        assert_eq!(engine.node_at(Position::new(13.0, 0.0)), Some(a));
    }

    #[test]
    fn test_node_at_follows_moves() {
        let mut engine = engine_with(&["a"]);
        let a = engine.lookup("a").unwrap();
        assert_eq!(engine.node_at(Position::new(0.0, 0.0)), Some(a));

        engine.set_position(a, Position::new(300.0, 300.0));
        assert_eq!(engine.node_at(Position::new(0.0, 0.0)), None);
        assert_eq!(engine.node_at(Position::new(301.0, 299.0)), Some(a));
    }

    #[test]
    fn test_position_map() {
        let engine = engine_with(&["a", "b", "c"]);
        let map = engine.position_map();

        assert_eq!(map.len(), 3);
        assert_eq!(map["b"], Position::new(100.0, 0.0));
    }

    #[test]
    fn test_state_flags() {
        let mut engine = engine_with(&["a"]);
        let a = engine.lookup("a").unwrap();
        engine.state_mut(a).unwrap().set_pinned(true);
        assert!(engine.state(a).is_pinned());
        assert!(!engine.state(NodeId(9)).is_pinned());
    }

    #[test]
    fn test_clear() {
        let mut engine = engine_with(&["a", "b"]);
        engine.add_edge("a-b".into(), "a", "b", EdgeOrigin::Supplied);

        engine.clear();
        assert_eq!(engine.node_count(), 0);
        assert_eq!(engine.edge_count(), 0);
        assert_eq!(engine.lookup("a"), None);
        assert!(engine.position_map().is_empty());
    }
}
