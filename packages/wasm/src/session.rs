//! LayoutSession - one live rendering of a graph.
//!
//! A session owns everything that belongs to a single rendering instance:
//! the engine with its positions, the focus controller, the random source and
//! an optional position store. It is created when a view mounts, fully
//! reloaded when data refreshes and destroyed when the view goes away.
//!
//! Loading runs the pipeline
//!
//! ```text
//! descriptor -> edges (synthesized if missing) -> sizes -> restore or grid -> settled
//! ```
//!
//! and clicks drive the [`FocusController`]. Hosts read results either by
//! draining [`GraphEvent`]s or by pushing frames into a [`SceneRenderer`].

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::GraphConfig;
use crate::error::DataError;
use crate::events::GraphEvent;
use crate::geometry::{Position, PositionMap};
use crate::graph::{GraphData, GraphEngine, NodeData, NodeId, NodeSpec};
use crate::interaction::FocusController;
use crate::layout::{GridPlacer, LayoutRng, Viewport, ensure_edges, layout_rng, normalize_sizes};
use crate::store::{PositionStore, session_key};

/// A node as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSprite {
    pub id: String,
    pub label: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// True for the focused node.
    pub active: bool,
}

/// An edge as handed to a renderer, with resolved endpoint coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeLine {
    pub id: String,
    pub source: String,
    pub target: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

/// Everything a renderer needs to draw one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub nodes: Vec<NodeSprite>,
    pub edges: Vec<EdgeLine>,
}

/// Drawing surface a session can push frames into.
pub trait SceneRenderer {
    fn set_nodes(&mut self, nodes: &[NodeSprite]);
    fn set_edges(&mut self, edges: &[EdgeLine]);
}

/// What a load did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub nodes: usize,
    pub edges: usize,
    /// Edges were invented because none were supplied.
    pub synthesized_edges: bool,
    /// Nodes that reused a saved or pinned position.
    pub restored: usize,
    /// Nodes placed on the grid.
    pub placed: usize,
    /// Entries without an id or repeating an earlier id.
    pub dropped_nodes: usize,
    /// Edges referencing a node that does not exist.
    pub dropped_edges: usize,
}

/// One live rendering instance.
pub struct LayoutSession {
    key: String,
    config: GraphConfig,
    viewport: Viewport,
    engine: GraphEngine,
    focus: FocusController,
    store: Option<Box<dyn PositionStore>>,
    rng: LayoutRng,
    events: Vec<GraphEvent>,
}

impl LayoutSession {
    /// Create an empty session for the container `container_id`.
    pub fn new(container_id: &str, viewport: Viewport, config: GraphConfig) -> Self {
        Self {
            key: session_key(container_id),
            focus: FocusController::new(&config),
            rng: layout_rng(config.seed),
            config,
            viewport,
            engine: GraphEngine::new(),
            store: None,
            events: Vec::new(),
        }
    }

    /// Attach a position store.
    pub fn with_store(mut self, store: impl PositionStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn engine(&self) -> &GraphEngine {
        &self.engine
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Replace the graph with `data`.
    ///
    /// Any focus cycle in flight is dropped. Nodes restored from the position
    /// store, or pinned by an earlier load, keep their coordinates; all others
    /// are placed on a freshly shuffled grid.
    pub fn load(&mut self, data: &GraphData) -> LoadReport {
        self.focus.reset();
        let carried = self.pinned_positions();
        self.engine.clear();

        let mut report = LoadReport::default();
        let nodes = unique_nodes(&data.nodes, &mut report);
        let ids: Vec<String> = nodes.iter().map(|(id, _)| id.to_string()).collect();

        let raw: Vec<f64> = nodes.iter().map(|(_, spec)| spec.raw_size()).collect();
        let sizes = normalize_sizes(&raw, self.config.size_range_min, self.config.size_range_max);

        let planned = ensure_edges(&ids, data.edges.as_deref(), &mut self.rng);
        report.synthesized_edges = data.needs_edges();

        let mut saved = self.saved_positions();
        saved.extend(carried);
        let restored: Vec<Option<Position>> = ids
            .iter()
            .map(|id| saved.get(id).copied().filter(|at| at.is_finite()))
            .collect();

        let unplaced = restored.iter().filter(|at| at.is_none()).count();
        let mut grid = if unplaced > 0 {
            GridPlacer::new(self.viewport.safe_area(), self.config.cell_size())
                .place(unplaced, &mut self.rng)
                .into_iter()
        } else {
            Vec::new().into_iter()
        };

        let default_color = self.config.theme.node_color();
        for (((id, spec), size), restore) in nodes.iter().zip(&sizes).zip(&restored) {
            let node_data = NodeData {
                key: id.to_string(),
                label: spec.label.clone().unwrap_or_else(|| id.to_string()),
                url: spec.url.clone().filter(|url| !url.trim().is_empty()),
                color: spec.color.clone().unwrap_or_else(|| default_color.to_string()),
                raw_size: spec.raw_size() as f32,
                base_size: *size,
            };
            let at = match restore {
                Some(at) => *at,
                None => grid.next().unwrap_or_else(|| self.viewport.safe_area().center()),
            };
            let Some(node) = self.engine.add_node(node_data, at) else {
                continue;
            };
            if restore.is_some() {
                if let Some(state) = self.engine.state_mut(node) {
                    state.set_pinned(true);
                }
                report.restored += 1;
            } else {
                report.placed += 1;
            }
        }

        for edge in planned {
            if self
                .engine
                .add_edge(edge.id.clone(), &edge.source, &edge.target, edge.origin)
                .is_none()
            {
                warn!(
                    edge = %edge.id,
                    source = %edge.source,
                    target = %edge.target,
                    "dropped edge with unknown endpoint"
                );
                report.dropped_edges += 1;
            }
        }

        report.nodes = self.engine.node_count();
        report.edges = self.engine.edge_count();
        if report.restored > 0 {
            info!(key = %self.key, restored = report.restored, placed = report.placed, "restored saved layout");
        }
        info!(
            nodes = report.nodes,
            edges = report.edges,
            synthesized = report.synthesized_edges,
            "graph loaded"
        );

        self.events.push(GraphEvent::LayoutSettled {
            positions: self.engine.position_map(),
        });
        report
    }

    /// Load from JSON text, tolerating markup around the object.
    pub fn load_json(&mut self, text: &str) -> Result<LoadReport, DataError> {
        let data = GraphData::from_json_lenient(text)?;
        Ok(self.load(&data))
    }

    /// Load from the compact `label|url|#hex; ...` form.
    pub fn load_inline_nodes(&mut self, spec: &str) -> LoadReport {
        self.load(&GraphData::from_inline_nodes(spec))
    }

    fn pinned_positions(&self) -> PositionMap {
        self.engine
            .node_ids()
            .filter(|&id| self.engine.state(id).is_pinned())
            .filter_map(|id| Some((self.engine.node(id)?.key.clone(), self.engine.position(id)?)))
            .collect()
    }

    fn saved_positions(&mut self) -> PositionMap {
        let Some(store) = self.store.as_mut() else {
            return PositionMap::new();
        };
        if !self.config.persist_positions {
            if let Err(err) = store.remove(&self.key) {
                warn!(key = %self.key, error = %err, "could not clear stale positions");
            }
            return PositionMap::new();
        }
        match store.get(&self.key) {
            Ok(saved) => saved.unwrap_or_default(),
            Err(err) => {
                warn!(key = %self.key, error = %err, "ignoring saved positions");
                PositionMap::new()
            }
        }
    }

    // =========================================================================
    // Host Events
    // =========================================================================

    /// Change the canvas size. Nodes stay where they are; the next focus
    /// cycle uses the new safe area.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.set_viewport(Viewport::new(width, height));
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        debug!(width = viewport.width, height = viewport.height, "viewport changed");
        self.viewport = viewport;
    }

    /// Focus the node with host id `key`. Unknown ids are ignored.
    pub fn click_node(&mut self, key: &str, now: f64) -> bool {
        let Some(node) = self.engine.lookup(key) else {
            warn!(node = key, "click on unknown node ignored");
            return false;
        };
        self.focus_node(node, now);
        true
    }

    /// Focus whatever node is under `(x, y)`, returning its id.
    ///
    /// Hit testing uses resting positions, which during an animation are the
    /// positions nodes are heading to.
    pub fn click_at(&mut self, x: f32, y: f32, now: f64) -> Option<String> {
        let node = self.engine.node_at(Position::new(x, y))?;
        self.focus_node(node, now);
        self.engine.node(node).map(|data| data.key.clone())
    }

    /// A click on empty canvas. Never interrupts a focus cycle.
    pub fn click_background(&mut self, now: f64) {
        debug!(now, focusing = self.focus.is_focusing(), "background click ignored");
    }

    fn focus_node(&mut self, node: NodeId, now: f64) {
        let started = self
            .focus
            .begin(&mut self.engine, node, now, self.viewport.safe_area(), &mut self.rng);
        if let Some(previous) = started.cancelled {
            debug!(previous = %previous, next = %node, "focus superseded");
        }
        if let Some(data) = self.engine.node(node) {
            self.events.push(GraphEvent::NodeFocused {
                node_id: data.key.clone(),
            });
        }
    }

    /// Advance time. Completes a due focus cycle, persisting and requesting
    /// navigation when the focused node has a url.
    ///
    /// Returns whether a cycle completed.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(done) = self.focus.poll(&mut self.engine, now) else {
            return false;
        };

        let positions = self.engine.position_map();
        self.events.push(GraphEvent::LayoutSettled {
            positions: positions.clone(),
        });

        let url = self.engine.node(done.node).and_then(|data| data.url.clone());
        match url {
            Some(url) if self.config.redirect_enabled => {
                if self.config.persist_positions {
                    self.persist(&positions);
                }
                info!(node = %done.node, url = %url, "navigating");
                self.events.push(GraphEvent::Navigate {
                    url,
                    open_in_new_tab: self.config.open_in_new_tab,
                });
            }
            _ => debug!(node = %done.node, "focus settled without navigation"),
        }
        true
    }

    fn persist(&mut self, positions: &PositionMap) {
        let Some(store) = self.store.as_mut() else {
            debug!(key = %self.key, "no position store attached");
            return;
        };
        if let Err(err) = store.set(&self.key, positions) {
            warn!(key = %self.key, error = %err, "failed to persist positions");
        }
    }

    /// When the pending focus cycle completes, if one is pending.
    pub fn next_due(&self) -> Option<f64> {
        self.focus.due_at()
    }

    pub fn is_focusing(&self) -> bool {
        self.focus.is_focusing()
    }

    /// Host id of the focused node.
    pub fn focused(&self) -> Option<&str> {
        let node = self.focus.focused()?;
        self.engine.node(node).map(|data| data.key.as_str())
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// The scene at `now`, with any in-flight animation sampled.
    pub fn frame(&self, now: f64) -> Frame {
        let frames = self.focus.sample(&self.engine, now);
        let focused = self.focus.focused();

        let nodes = self
            .engine
            .nodes()
            .iter()
            .zip(&frames)
            .enumerate()
            .map(|(slot, (data, frame))| NodeSprite {
                id: data.key.clone(),
                label: data.label.clone(),
                color: data.color.clone(),
                url: data.url.clone(),
                x: frame.position.x,
                y: frame.position.y,
                size: frame.size,
                active: focused == Some(NodeId(slot as u32)),
            })
            .collect();

        let edges = self
            .engine
            .edges()
            .iter()
            .filter_map(|edge| {
                let from = frames.get(edge.source.index())?.position;
                let to = frames.get(edge.target.index())?.position;
                Some(EdgeLine {
                    id: edge.key.clone(),
                    source: self.engine.node(edge.source)?.key.clone(),
                    target: self.engine.node(edge.target)?.key.clone(),
                    x1: from.x,
                    y1: from.y,
                    x2: to.x,
                    y2: to.y,
                })
            })
            .collect();

        Frame { nodes, edges }
    }

    /// Push the scene at `now` into `renderer`.
    pub fn render<R: SceneRenderer + ?Sized>(&self, renderer: &mut R, now: f64) {
        let frame = self.frame(now);
        renderer.set_nodes(&frame.nodes);
        renderer.set_edges(&frame.edges);
    }

    /// Resting position of every node.
    pub fn positions(&self) -> PositionMap {
        self.engine.position_map()
    }

    /// Take all events raised since the last call.
    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tear the session down. Pending work is dropped and the graph cleared.
    pub fn destroy(&mut self) {
        self.focus.reset();
        self.engine.clear();
        self.events.clear();
        debug!(key = %self.key, "session destroyed");
    }
}

/// Nodes with an id, first occurrence of each id only.
fn unique_nodes<'a>(specs: &'a [NodeSpec], report: &mut LoadReport) -> Vec<(&'a str, &'a NodeSpec)> {
    let mut seen = HashSet::with_capacity(specs.len());
    let mut nodes = Vec::with_capacity(specs.len());
    for spec in specs {
        let Some(id) = spec.id.as_deref() else {
            warn!(label = ?spec.label, "dropped node without id");
            report.dropped_nodes += 1;
            continue;
        };
        if !seen.insert(id) {
            warn!(node = id, "dropped duplicate node id");
            report.dropped_nodes += 1;
            continue;
        }
        nodes.push((id, spec));
    }
    nodes
}
