//! Interpolation between two layouts.
//!
//! The engine stores where nodes are heading; a [`Transition`] remembers where
//! they came from so intermediate frames can be sampled at any instant. A
//! cancelled focus cycle uses a sample as the baseline of the next one.

use crate::geometry::Position;

/// Position and size of one node at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeFrame {
    pub position: Position,
    pub size: f32,
}

impl NodeFrame {
    pub fn new(position: Position, size: f32) -> Self {
        Self { position, size }
    }

    fn lerp(self, to: NodeFrame, t: f32) -> NodeFrame {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        NodeFrame {
            position: Position::new(
                mix(self.position.x, to.position.x),
                mix(self.position.y, to.position.y),
            ),
            size: mix(self.size, to.size),
        }
    }
}

/// Cubic ease-in-out on `[0, 1]`.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// A timed move from one set of frames to another, indexed by node slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    started_at: f64,
    duration_ms: f64,
    from: Vec<NodeFrame>,
    to: Vec<NodeFrame>,
}

impl Transition {
    /// `from` and `to` must be indexed by the same slots.
    pub fn new(started_at: f64, duration_ms: f64, from: Vec<NodeFrame>, to: Vec<NodeFrame>) -> Self {
        debug_assert_eq!(from.len(), to.len());
        Self {
            started_at,
            duration_ms: duration_ms.max(0.0),
            from,
            to,
        }
    }

    /// Linear progress in `[0, 1]`. Zero-length transitions are complete
    /// immediately.
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Every node's frame at `now`.
    pub fn sample(&self, now: f64) -> Vec<NodeFrame> {
        let t = ease_in_out(self.progress(now));
        self.from
            .iter()
            .zip(&self.to)
            .map(|(from, to)| from.lerp(*to, t))
            .collect()
    }
}
