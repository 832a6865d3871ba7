//! Node type and related structures.
//!
//! Nodes are the labeled circles of the graph. Each node has:
//! - A stable slot identifier (index into the engine's SoA buffers)
//! - The host's string id, label, optional url and color
//! - A raw importance value and the normalized radius derived from it
//! - Interaction state (focused, locked, pinned)

use std::fmt;

/// Stable node slot identifier.
///
/// Slots are assigned in input order when a graph is loaded and stay valid
/// until the next load. It wraps a u32 for efficient storage and WebAssembly
/// interop; the host-facing identity is [`NodeData::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Slot index into per-node buffers.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Descriptive payload of a loaded node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Host-supplied unique id.
    pub key: String,
    pub label: String,
    pub url: Option<String>,
    /// Fill color, already resolved against the theme default.
    pub color: String,
    /// Importance value the normalized size was derived from.
    pub raw_size: f32,
    /// Normalized resting size, always inside the configured size range.
    pub base_size: f32,
}

/// Node state flags packed into a single byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
    flags: u8,
}

impl NodeState {
    const FOCUSED: u8 = 0b0000_0001;
    const LOCKED: u8 = 0b0000_0010;
    const PINNED: u8 = 0b0000_0100;

    /// Create a new default node state.
    #[inline]
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    /// Check if the node is the active (enlarged) node.
    #[inline]
    pub fn is_focused(self) -> bool {
        self.flags & Self::FOCUSED != 0
    }

    /// Set the focused state.
    #[inline]
    pub fn set_focused(&mut self, focused: bool) {
        self.set(Self::FOCUSED, focused);
    }

    /// Check if the node is locked by an in-flight focus animation.
    #[inline]
    pub fn is_locked(self) -> bool {
        self.flags & Self::LOCKED != 0
    }

    /// Set the locked state.
    #[inline]
    pub fn set_locked(&mut self, locked: bool) {
        self.set(Self::LOCKED, locked);
    }

    /// Check if the node is pinned (its position was restored and survives
    /// automatic relayout).
    #[inline]
    pub fn is_pinned(self) -> bool {
        self.flags & Self::PINNED != 0
    }

    /// Set the pinned state.
    #[inline]
    pub fn set_pinned(&mut self, pinned: bool) {
        self.set(Self::PINNED, pinned);
    }

    #[inline]
    fn set(&mut self, mask: u8, on: bool) {
        if on {
            self.flags |= mask;
        } else {
            self.flags &= !mask;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(format!("{}", id), "Node(42)");
    }

    #[test]
    fn test_node_state_default() {
        let state = NodeState::new();
        assert!(!state.is_focused());
        assert!(!state.is_locked());
        assert!(!state.is_pinned());
    }

    #[test]
    fn test_node_state_flags_are_independent() {
        let mut state = NodeState::new();
        state.set_focused(true);
        state.set_locked(true);
        state.set_pinned(true);
        assert!(state.is_focused());
        assert!(state.is_locked());
        assert!(state.is_pinned());

        state.set_locked(false);
        assert!(state.is_focused());
        assert!(!state.is_locked());
        assert!(state.is_pinned());
    }
}
