//! Network Graph - WASM Module
//!
//! Layout and interaction engine for small labeled link graphs. It decides
//! where nodes go, how large they are and what happens when one is clicked;
//! drawing is left to the host. Compiled to WebAssembly, it exposes a
//! JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: Graph data structure using petgraph's StableGraph
//! - `spatial`: R-tree spatial indexing for O(log n) hit testing and collision checks
//! - `layout`: Size normalization, edge synthesis and grid placement
//! - `interaction`: Focus state machine, scheduling and transitions
//! - `store`: Saved positions between page views
//! - `session`: One live rendering instance tying the above together
//! - `logging`: Forwards `tracing` events to the browser console

use js_sys::{Float32Array, Function};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod graph;
pub mod interaction;
pub mod layout;
mod lenient;
pub mod logging;
pub mod session;
pub mod spatial;
pub mod store;

use config::{GraphConfig, GraphOptions};
use graph::GraphData;
use interaction::{Clock, SystemClock};
use layout::Viewport;
use session::{EdgeLine, LayoutSession, NodeSprite, SceneRenderer};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init(tracing::Level::WARN);
}

fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

/// Serialize into plain JS objects (maps become objects, not `Map`s).
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

/// Adapts a pair of JS callbacks to [`SceneRenderer`].
struct JsRenderer {
    set_nodes: Function,
    set_edges: Function,
}

impl JsRenderer {
    fn call(callback: &Function, payload: Result<JsValue, JsValue>) {
        let result = payload.and_then(|value| callback.call1(&JsValue::NULL, &value));
        if let Err(err) = result {
            console_warn(&format!("network-graph: renderer callback failed: {err:?}"));
        }
    }
}

impl SceneRenderer for JsRenderer {
    fn set_nodes(&mut self, nodes: &[NodeSprite]) {
        Self::call(&self.set_nodes, to_js(nodes));
    }

    fn set_edges(&mut self, edges: &[EdgeLine]) {
        Self::call(&self.set_edges, to_js(edges));
    }
}

/// Main entry point for the graph engine.
///
/// Wraps a [`LayoutSession`] and exposes it to JavaScript. Every
/// time-dependent method takes the host's `now` in milliseconds; the `*Now`
/// variants read a monotonic clock instead.
#[wasm_bindgen]
pub struct NetworkGraphWasm {
    session: LayoutSession,
    clock: SystemClock,
    renderer: Option<JsRenderer>,
}

#[wasm_bindgen]
impl NetworkGraphWasm {
    /// Create a session for the container `container_id`.
    ///
    /// `options` is a plain object with the recognized keys (`sizeRangeMin`,
    /// `activeSize`, `persistPositions`, ...) or the same object as JSON text,
    /// e.g. read from a `data-options` attribute. Anything unusable falls
    /// back to defaults with a console warning.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, width: f32, height: f32, options: JsValue) -> Self {
        let options = if options.is_undefined() || options.is_null() {
            GraphOptions::default()
        } else if let Some(text) = options.as_string() {
            GraphOptions::from_json(&text).unwrap_or_else(|err| {
                console_warn(&format!("network-graph: ignoring invalid options: {err}"));
                GraphOptions::default()
            })
        } else {
            serde_wasm_bindgen::from_value(options).unwrap_or_else(|err| {
                console_warn(&format!("network-graph: ignoring invalid options: {err}"));
                GraphOptions::default()
            })
        };
        let config = GraphConfig::resolve(&options);
        let session = LayoutSession::new(container_id, Viewport::new(width, height), config);

        #[cfg(target_arch = "wasm32")]
        let session = match store::LocalStorageStore::open() {
            Ok(storage) => session.with_store(storage),
            Err(err) => {
                console_warn(&format!("network-graph: {err}; positions will not persist"));
                session
            }
        };

        Self {
            session,
            clock: SystemClock::new(),
            renderer: None,
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load a `{ nodes, edges? }` object. Returns a load report.
    pub fn load(&mut self, data: JsValue) -> Result<JsValue, JsValue> {
        let data: GraphData =
            serde_wasm_bindgen::from_value(data).map_err(|err| JsValue::from_str(&err.to_string()))?;
        let report = self.session.load(&data);
        self.push_frame();
        to_js(&report)
    }

    /// Load graph JSON, tolerating markup wrapped around the object.
    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&mut self, text: &str) -> Result<JsValue, JsValue> {
        let report = self.session.load_json(text).map_err(|err| {
            console_warn(&format!("network-graph: {err}"));
            JsValue::from_str(&err.to_string())
        })?;
        self.push_frame();
        to_js(&report)
    }

    /// Load nodes from the compact `label|url|#hex; ...` form.
    #[wasm_bindgen(js_name = loadInlineNodes)]
    pub fn load_inline_nodes(&mut self, spec: &str) -> Result<JsValue, JsValue> {
        let report = self.session.load_inline_nodes(spec);
        self.push_frame();
        to_js(&report)
    }

    // =========================================================================
    // Host Events
    // =========================================================================

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(width, height);
    }

    /// Focus a node by id. Returns false for unknown ids.
    #[wasm_bindgen(js_name = clickNode)]
    pub fn click_node(&mut self, node_id: &str, now: f64) -> bool {
        self.session.click_node(node_id, now)
    }

    #[wasm_bindgen(js_name = clickNodeNow)]
    pub fn click_node_now(&mut self, node_id: &str) -> bool {
        let now = self.clock.now_ms();
        self.session.click_node(node_id, now)
    }

    /// Focus the node under a canvas point. Returns its id.
    #[wasm_bindgen(js_name = clickAt)]
    pub fn click_at(&mut self, x: f32, y: f32, now: f64) -> Option<String> {
        self.session.click_at(x, y, now)
    }

    #[wasm_bindgen(js_name = clickBackground)]
    pub fn click_background(&mut self, now: f64) {
        self.session.click_background(now);
    }

    /// Advance time to `now`. Returns true when a focus cycle completed.
    pub fn tick(&mut self, now: f64) -> bool {
        self.session.tick(now)
    }

    #[wasm_bindgen(js_name = tickNow)]
    pub fn tick_now(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.session.tick(now)
    }

    /// Milliseconds on the clock used by the `*Now` methods.
    pub fn now(&self) -> f64 {
        self.clock.now_ms()
    }

    /// When the pending focus cycle completes, if any.
    #[wasm_bindgen(js_name = nextDue)]
    pub fn next_due(&self) -> Option<f64> {
        self.session.next_due()
    }

    #[wasm_bindgen(js_name = isFocusing)]
    pub fn is_focusing(&self) -> bool {
        self.session.is_focusing()
    }

    /// Id of the focused node.
    pub fn focused(&self) -> Option<String> {
        self.session.focused().map(str::to_string)
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// The scene at `now` as `{ nodes, edges }`.
    pub fn frame(&self, now: f64) -> Result<JsValue, JsValue> {
        to_js(&self.session.frame(now))
    }

    /// Node positions and sizes at `now` packed as `[x0, y0, size0, x1, ...]`
    /// in load order.
    #[wasm_bindgen(js_name = frameBuffer)]
    pub fn frame_buffer(&self, now: f64) -> Float32Array {
        let frame = self.session.frame(now);
        let packed: Vec<f32> = frame
            .nodes
            .iter()
            .flat_map(|sprite| [sprite.x, sprite.y, sprite.size])
            .collect();
        Float32Array::from(packed.as_slice())
    }

    /// Attach renderer callbacks. Each receives an array of sprites or lines.
    #[wasm_bindgen(js_name = setRenderer)]
    pub fn set_renderer(&mut self, set_nodes: Function, set_edges: Function) {
        self.renderer = Some(JsRenderer {
            set_nodes,
            set_edges,
        });
        self.push_frame();
    }

    #[wasm_bindgen(js_name = clearRenderer)]
    pub fn clear_renderer(&mut self) {
        self.renderer = None;
    }

    /// Push the scene at `now` to the attached renderer.
    pub fn render(&mut self, now: f64) {
        if let Some(renderer) = self.renderer.as_mut() {
            self.session.render(renderer, now);
        }
    }

    /// Resting positions keyed by node id.
    pub fn positions(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.positions())
    }

    /// Events raised since the last call, oldest first.
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<JsValue, JsValue> {
        to_js(&self.session.drain_events())
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.session.engine().node_count() as u32
    }

    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.session.engine().edge_count() as u32
    }

    /// Drop pending work and the graph. The instance stays usable.
    pub fn destroy(&mut self) {
        self.renderer = None;
        self.session.destroy();
    }
}

impl NetworkGraphWasm {
    fn push_frame(&mut self) {
        let now = self.clock.now_ms();
        self.render(now);
    }
}
