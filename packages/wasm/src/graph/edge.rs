//! Edge type and related structures.
//!
//! Edges are the connections between nodes. Each edge has:
//! - A stable slot identifier
//! - A string id (supplied, or derived as `source-target`)
//! - Source and target node slots
//! - The origin of the edge (supplied by the host or synthesized)
//!
//! Edges are undirected for layout purposes.

use super::node::NodeId;

/// Stable edge identifier, the weight stored on graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub u32);

/// Where an edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    /// Supplied in the input descriptor.
    Supplied,
    /// Part of the synthesized ring.
    Ring,
    /// Extra synthesized edge between a random pair.
    Random,
}

/// A resolved edge between two loaded nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeData {
    pub key: String,
    pub source: NodeId,
    pub target: NodeId,
    pub origin: EdgeOrigin,
}
