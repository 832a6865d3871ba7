//! Layout algorithms for graph visualization.
//!
//! This module provides CPU-side algorithms that decide where nodes go and how
//! large they are. Positions are computed once, deterministically for a given
//! random source, and never iteratively relaxed.

pub mod edges;
pub mod grid;
pub mod size;
pub mod viewport;

pub use edges::{PlannedEdge, ensure_edges, synthesize_edges, undirected_key};
pub use grid::GridPlacer;
pub use size::{SizeRange, normalize_sizes};
pub use viewport::{Bounds, Margins, SafeArea, Viewport};

use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Random source used by every randomized layout step.
pub type LayoutRng = SmallRng;

/// Create the layout random source.
///
/// A fixed seed gives reproducible layouts; without one the wall clock is
/// used so every fresh layout looks different.
pub fn layout_rng(seed: Option<u64>) -> LayoutRng {
    let seed = seed.unwrap_or_else(|| {
        web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(0x5eed)
    });
    SmallRng::seed_from_u64(seed)
}
