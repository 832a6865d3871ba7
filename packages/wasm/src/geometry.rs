//! Small geometric value types shared across modules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A node center in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance_sq(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn distance(self, other: Position) -> f32 {
        self.distance_sq(other).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Positions keyed by host node id. Ordered so snapshots serialize stably.
pub type PositionMap = BTreeMap<String, Position>;

/// `v` limited to `[lo, hi]`. Unlike `f32::clamp` this never panics: when the
/// range is inverted (a canvas smaller than the node) `lo` wins.
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.min(hi).max(lo)
}
