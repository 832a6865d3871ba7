//! Graph data structures and operations.
//!
//! This module provides the core graph structure using petgraph's StableGraph
//! with Structure of Arrays (SoA) layout for positions and sizes, plus the
//! host-facing input descriptor the graph is loaded from.

mod descriptor;
mod edge;
mod engine;
mod node;

pub use descriptor::{DEFAULT_RAW_SIZE, EdgeSpec, GraphData, NodeSpec};
pub use edge::{EdgeData, EdgeId, EdgeOrigin};
pub use engine::{GraphEngine, HIT_PADDING};
pub use node::{NodeData, NodeId, NodeState};
