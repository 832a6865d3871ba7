//! Collision-avoiding displacement of non-focused nodes.
//!
//! Each node is pushed a random distance (a fraction of the jitter radius) in
//! a random direction, clamped into the safe area. A candidate that lands
//! within the minimum separation of the focused node or of a node already
//! placed in this pass is rejected and resampled. When every retry fails the
//! candidate with the most clearance is kept, so the pass always terminates
//! and never leaves a node behind.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::GraphConfig;
use crate::geometry::Position;
use crate::graph::NodeId;
use crate::layout::SafeArea;
use crate::spatial::SpatialIndex;

/// Gap kept between a displaced node's rim and the safe area edge.
pub const EDGE_BUFFER: f32 = 15.0;

/// Resamples allowed after the first candidate.
pub const MAX_RETRIES: usize = 15;

/// Displacement radius as a fraction of the jitter radius.
const MIN_RADIUS_FRACTION: f32 = 0.4;
const MAX_RADIUS_FRACTION: f32 = 1.0;

/// Tuning for one displacement pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementParams {
    pub jitter: f32,
    pub min_separation: f32,
    pub others_max_size: f32,
    pub edge_buffer: f32,
    pub max_retries: usize,
}

impl DisplacementParams {
    pub fn from_config(config: &GraphConfig) -> Self {
        Self {
            jitter: config.jitter,
            min_separation: config.min_separation(),
            others_max_size: config.others_max_size,
            edge_buffer: EDGE_BUFFER,
            max_retries: MAX_RETRIES,
        }
    }
}

/// Where one node ends up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Displaced {
    pub id: NodeId,
    pub position: Position,
    pub size: f32,
    /// False when every candidate violated the separation and the best one
    /// was kept anyway.
    pub clear: bool,
}

/// Plan new positions and sizes for `others`, given as `(id, position,
/// current size)`, around a node focused at `focus_at`.
///
/// Nodes are processed in the given order; earlier nodes constrain later
/// ones.
pub fn plan_displacement<R: Rng + ?Sized>(
    focus_at: Position,
    others: &[(NodeId, Position, f32)],
    safe: &SafeArea,
    params: &DisplacementParams,
    rng: &mut R,
) -> Vec<Displaced> {
    let min_sep_sq = params.min_separation * params.min_separation;
    let jitter = params.jitter.max(0.0);

    // The focused node's id never leaks out of this function; the index is
    // only queried for distances.
    let mut occupied = SpatialIndex::new();
    occupied.insert(NodeId(u32::MAX), focus_at);

    let mut planned = Vec::with_capacity(others.len());
    for &(id, from, size) in others {
        let size = size.min(params.others_max_size);
        let bounds = safe.inset(size / 2.0 + params.edge_buffer);

        let mut sample = || {
            let angle = rng.random_range(0.0..TAU);
            let radius = jitter * rng.random_range(MIN_RADIUS_FRACTION..=MAX_RADIUS_FRACTION);
            bounds.clamp(Position::new(
                from.x + angle.cos() * radius,
                from.y + angle.sin() * radius,
            ))
        };

        let mut best = sample();
        let mut best_clearance = occupied.nearest_distance_sq(best);
        let mut retries = 0;
        while best_clearance < min_sep_sq && retries < params.max_retries {
            retries += 1;
            let candidate = sample();
            let clearance = occupied.nearest_distance_sq(candidate);
            if clearance > best_clearance {
                best = candidate;
                best_clearance = clearance;
            }
        }

        occupied.insert(id, best);
        planned.push(Displaced {
            id,
            position: best,
            size,
            clear: best_clearance >= min_sep_sq,
        });
    }
    planned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Viewport, layout_rng};

    fn params() -> DisplacementParams {
        DisplacementParams::from_config(&GraphConfig::default())
    }

    #[test]
    fn test_sizes_are_capped() {
        let safe = Viewport::new(1000.0, 800.0).safe_area();
        let others = [
            (NodeId(1), Position::new(200.0, 200.0), 20.0),
            (NodeId(2), Position::new(700.0, 600.0), 14.0),
        ];
        let params = DisplacementParams {
            others_max_size: 16.0,
            ..params()
        };
        let planned = plan_displacement(Position::new(500.0, 400.0), &others, &safe, &params, &mut layout_rng(Some(1)));

        assert_eq!(planned[0].size, 16.0);
        assert_eq!(planned[1].size, 14.0);
    }

    #[test]
    fn test_displacement_stays_within_jitter() {
        let safe = Viewport::new(2000.0, 2000.0).safe_area();
        let from = Position::new(300.0, 300.0);
        let others = [(NodeId(0), from, 17.0)];
        let params = params();
        let planned = plan_displacement(Position::new(1500.0, 1500.0), &others, &safe, &params, &mut layout_rng(Some(3)));

        let moved = planned[0].position.distance(from);
        assert!(moved >= params.jitter * 0.4 - 1e-3, "moved {moved}");
        assert!(moved <= params.jitter + 1e-3, "moved {moved}");
        assert!(planned[0].clear);
    }

    #[test]
    fn test_nodes_stay_inside_safe_area() {
        let safe = Viewport::new(400.0, 300.0).safe_area();
        let others: Vec<_> = (0..6)
            .map(|i| (NodeId(i), Position::new(safe.left, safe.top + i as f32 * 20.0), 20.0))
            .collect();
        let planned = plan_displacement(safe.center(), &others, &safe, &params(), &mut layout_rng(Some(8)));

        for node in planned {
            assert!(safe.contains(node.position), "{:?} escaped", node.position);
        }
    }

    #[test]
    fn test_clear_candidates_respect_separation() {
        let safe = Viewport::new(1600.0, 1200.0).safe_area();
        let others: Vec<_> = (0..8)
            .map(|i| {
                let col = (i % 4) as f32;
                let row = (i / 4) as f32;
                (NodeId(i), Position::new(300.0 + col * 250.0, 400.0 + row * 300.0), 17.0)
            })
            .collect();
        let focus_at = Position::new(800.0, 100.0);
        let params = params();
        let planned = plan_displacement(focus_at, &others, &safe, &params, &mut layout_rng(Some(21)));

        for (i, a) in planned.iter().enumerate() {
            assert!(a.clear);
            assert!(a.position.distance(focus_at) >= params.min_separation - 1e-3);
            for b in &planned[i + 1..] {
                assert!(a.position.distance(b.position) >= params.min_separation - 1e-3);
            }
        }
    }

    #[test]
    fn test_crowding_terminates_with_best_effort() {
        // Every node starts on top of the focused one and jitter is too small
        // to ever reach the separation distance.
        let safe = Viewport::new(1000.0, 800.0).safe_area();
        let focus_at = safe.center();
        let others: Vec<_> = (0..5).map(|i| (NodeId(i), focus_at, 17.0)).collect();
        let params = DisplacementParams {
            jitter: 5.0,
            ..params()
        };
        let planned = plan_displacement(focus_at, &others, &safe, &params, &mut layout_rng(Some(2)));

        assert_eq!(planned.len(), 5);
        assert!(planned.iter().all(|node| !node.clear));
    }

    #[test]
    fn test_zero_jitter_keeps_positions() {
        let safe = Viewport::new(1000.0, 800.0).safe_area();
        let from = Position::new(300.0, 300.0);
        let params = DisplacementParams {
            jitter: 0.0,
            ..params()
        };
        let planned = plan_displacement(Position::new(700.0, 500.0), &[(NodeId(0), from, 17.0)], &safe, &params, &mut layout_rng(Some(2)));
        assert_eq!(planned[0].position, from);
    }
}
