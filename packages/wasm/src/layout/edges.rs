//! Edge synthesis for graphs supplied without edges.
//!
//! A graph with no edges renders as a scatter of dots, so the engine invents
//! a connected baseline:
//!
//! 1. A **ring** joining the nodes in input order and closing back to the
//!    first node.
//! 2. Up to `floor(n / 2)` **random extra edges** between distinct pairs that
//!    are not connected yet, found by rejection sampling with a bounded number
//!    of attempts so near-complete graphs still terminate.
//!
//! Supplied edges are never touched; synthesis only runs when none exist.

use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use crate::graph::{EdgeOrigin, EdgeSpec};

/// An edge ready to be loaded into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub origin: EdgeOrigin,
}

/// Direction-independent identity of a node pair.
pub fn undirected_key(a: &str, b: &str) -> String {
    if a < b {
        format!("{a}|{b}")
    } else {
        format!("{b}|{a}")
    }
}

/// Resolve the edge list for a load.
///
/// Supplied edges are passed through with their ids defaulted to
/// `source-target`; entries without both endpoints are dropped. When the
/// supplied list is missing or empty, edges are synthesized over `node_ids`.
pub fn ensure_edges<R: Rng + ?Sized>(
    node_ids: &[String],
    supplied: Option<&[EdgeSpec]>,
    rng: &mut R,
) -> Vec<PlannedEdge> {
    match supplied {
        Some(edges) if !edges.is_empty() => edges
            .iter()
            .filter_map(|edge| {
                let source = edge.source.clone()?;
                let target = edge.target.clone()?;
                let id = edge
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("{source}-{target}"));
                Some(PlannedEdge {
                    id,
                    source,
                    target,
                    origin: EdgeOrigin::Supplied,
                })
            })
            .collect(),
        _ => synthesize_edges(node_ids, rng),
    }
}

/// Build a ring over `node_ids` plus up to `floor(n / 2)` random extra edges.
pub fn synthesize_edges<R: Rng + ?Sized>(node_ids: &[String], rng: &mut R) -> Vec<PlannedEdge> {
    let n = node_ids.len();
    let mut edges = Vec::with_capacity(n + n / 2);
    let mut used = HashSet::with_capacity(n + n / 2);

    if n >= 2 {
        for i in 0..n {
            let source = &node_ids[i];
            let target = &node_ids[(i + 1) % n];
            if used.insert(undirected_key(source, target)) {
                edges.push(PlannedEdge {
                    id: format!("{source}-{target}"),
                    source: source.clone(),
                    target: target.clone(),
                    origin: EdgeOrigin::Ring,
                });
            }
        }
    }
    let ring = edges.len();

    let target_random = n / 2;
    let max_attempts = target_random * 10 + 20;
    let mut added = 0;
    let mut attempts = 0;
    while added < target_random && attempts < max_attempts {
        attempts += 1;
        let a = rng.random_range(0..n);
        let b = rng.random_range(0..n);
        if a == b {
            continue;
        }
        let (source, target) = (&node_ids[a], &node_ids[b]);
        if !used.insert(undirected_key(source, target)) {
            continue;
        }
        edges.push(PlannedEdge {
            id: format!("r-{source}-{target}"),
            source: source.clone(),
            target: target.clone(),
            origin: EdgeOrigin::Random,
        });
        added += 1;
    }

    debug!(nodes = n, ring, random = added, attempts, "synthesized edges");
    edges
}
