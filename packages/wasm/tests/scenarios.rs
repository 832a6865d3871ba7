//! End-to-end interaction scenarios driven by a manual clock.

use network_graph_wasm::config::{GraphConfig, GraphOptions};
use network_graph_wasm::events::GraphEvent;
use network_graph_wasm::geometry::Position;
use network_graph_wasm::graph::{EdgeOrigin, GraphData, NodeSpec};
use network_graph_wasm::interaction::{Clock, ManualClock};
use network_graph_wasm::layout::Viewport;
use network_graph_wasm::session::LayoutSession;
use network_graph_wasm::store::MemoryStore;

fn session(options: GraphOptions) -> LayoutSession {
    let config = GraphConfig::resolve(&GraphOptions {
        seed: Some(2024),
        ..options
    });
    LayoutSession::new("scenario", Viewport::new(1280.0, 720.0), config)
}

fn nodes(ids: &[&str]) -> GraphData {
    GraphData {
        nodes: ids
            .iter()
            .map(|id| NodeSpec::new(*id).with_url(format!("https://example.com/{id}")))
            .collect(),
        edges: None,
    }
}

fn navigations(session: &mut LayoutSession) -> Vec<String> {
    session
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            GraphEvent::Navigate { url, .. } => Some(url),
            _ => None,
        })
        .collect()
}

fn on_screen(session: &LayoutSession, now: f64) -> Vec<(Position, f32)> {
    session
        .frame(now)
        .nodes
        .iter()
        .map(|sprite| (Position::new(sprite.x, sprite.y), sprite.size))
        .collect()
}

#[test]
fn five_nodes_without_edges_get_ring_plus_extras() {
    for seed in 0..20 {
        let config = GraphConfig::resolve(&GraphOptions {
            seed: Some(seed),
            ..Default::default()
        });
        let mut session = LayoutSession::new("s", Viewport::default(), config);
        let report = session.load(&nodes(&["a", "b", "c", "d", "e"]));

        assert!((5..=7).contains(&report.edges), "seed {seed}: {} edges", report.edges);
        let edges = session.engine().edges();
        let ring = edges.iter().filter(|edge| edge.origin == EdgeOrigin::Ring).count();
        assert_eq!(ring, 5);
        assert!(edges.iter().all(|edge| edge.source != edge.target));
    }
}

#[test]
fn click_then_navigate_after_delay() {
    let clock = ManualClock::new(0.0);
    let mut session = session(GraphOptions::default());
    session.load(&GraphData::new(
        vec![
            NodeSpec::new("X").with_url("https://example.com"),
            NodeSpec::new("Y"),
            NodeSpec::new("Z"),
        ],
        vec![],
    ));
    session.drain_events();

    session.click_node("X", clock.now_ms());
    assert_eq!(
        session.drain_events(),
        vec![GraphEvent::NodeFocused { node_id: "X".into() }]
    );

    // Size trends toward the active size while the animation runs.
    let mut last = 0.0;
    while clock.now_ms() < 2000.0 {
        let frame = session.frame(clock.now_ms());
        let x = frame.nodes.iter().find(|sprite| sprite.id == "X").unwrap();
        assert!(x.active);
        assert!(x.size >= last);
        last = x.size;

        assert!(!session.tick(clock.now_ms()));
        clock.advance(100.0);
    }
    assert!(last < 26.0);
    assert_eq!(session.frame(2000.0).nodes[0].size, 26.0);

    clock.set(2099.0);
    assert!(!session.tick(clock.now_ms()));
    clock.set(2100.0);
    assert!(session.tick(clock.now_ms()));

    let events = session.drain_events();
    assert_eq!(
        events.last(),
        Some(&GraphEvent::Navigate {
            url: "https://example.com".into(),
            open_in_new_tab: false,
        })
    );
}

#[test]
fn second_click_supersedes_first() {
    let clock = ManualClock::new(0.0);
    let mut session = session(GraphOptions::default());
    session.load(&nodes(&["X", "Y", "A", "B"]));

    session.click_node("X", clock.now_ms());
    clock.advance(500.0);

    // The layout on screen at 500ms is where Y's cycle starts from, sizes
    // included: X shrinks from its half-grown size rather than snapping.
    let shown: Vec<(Position, f32)> = on_screen(&session, clock.now_ms());
    assert!(shown[0].1 > 17.0);
    session.click_node("Y", clock.now_ms());
    assert_eq!(on_screen(&session, clock.now_ms()), shown);

    for t in [2100.0, 2500.0, 2599.0] {
        clock.set(t);
        assert!(!session.tick(clock.now_ms()));
    }
    clock.set(2600.0);
    assert!(session.tick(clock.now_ms()));
    assert_eq!(navigations(&mut session), vec!["https://example.com/Y"]);

    clock.advance(10_000.0);
    assert!(!session.tick(clock.now_ms()));
}

#[test]
fn resize_during_focus_keeps_captured_bounds() {
    let mut session = session(GraphOptions::default());
    session.load(&nodes(&["a", "b", "c", "d", "e", "f"]));
    let wide = session.viewport().safe_area();

    session.click_node("a", 0.0);
    let planned = session.positions();
    session.resize(240.0, 200.0);

    assert_eq!(session.positions(), planned);
    assert!(planned.values().all(|at| wide.contains(*at)));
    assert!(session.tick(2100.0));
    assert_eq!(session.positions(), planned);
}

#[test]
fn displaced_nodes_keep_their_distance() {
    // Small jitter keeps grid neighbours apart without relying on retries.
    let mut session = session(GraphOptions {
        jitter: Some(10.0),
        ..Default::default()
    });
    session.load(&nodes(&["a", "b", "c", "d", "e", "f", "g", "h"]));
    let min_sep = session.config().min_separation();

    session.click_node("d", 0.0);
    session.tick(2100.0);

    let positions: Vec<Position> = session.positions().into_values().collect();
    let safe = session.viewport().safe_area();
    for (i, a) in positions.iter().enumerate() {
        assert!(safe.contains(*a));
        for b in &positions[i + 1..] {
            assert!(a.distance(*b) >= min_sep - 1e-3, "{a:?} and {b:?} too close");
        }
    }
}

#[test]
fn saved_layout_restores_exactly() {
    let store = MemoryStore::new();
    store.insert_raw(
        "network-graph-pos-scenario",
        r#"{"X":{"x":100.5,"y":200.25},"Y":{"x":640.0,"y":360.0},"A":{"x":1000.0,"y":90.0}}"#,
    );
    let mut session = session(GraphOptions {
        persist_positions: Some(true),
        ..Default::default()
    })
    .with_store(store);

    let report = session.load(&nodes(&["X", "Y", "A"]));
    assert_eq!(report.placed, 0);
    assert_eq!(session.positions()["X"], Position::new(100.5, 200.25));
    assert_eq!(session.positions()["A"], Position::new(1000.0, 90.0));
}

#[test]
fn stale_snapshot_is_ignored_when_persistence_is_off() {
    let store = MemoryStore::new();
    store.insert_raw("network-graph-pos-scenario", r#"{"X":{"x":1.0,"y":1.0}}"#);
    let mut session = session(GraphOptions::default()).with_store(store.clone());

    let report = session.load(&nodes(&["X", "Y"]));
    assert_eq!(report.restored, 0);
    assert!(store.is_empty());
    assert_ne!(session.positions()["X"], Position::new(1.0, 1.0));
}
