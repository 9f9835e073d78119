use std::collections::HashMap;
use std::path::Path;

use mindmap_engine::{
    Config, GraphStore, InteractionController, Layout, LayoutConfig, LayoutError, Node, NodeKind,
    NodeSpec, Point, compute_layout,
};

fn load_fixture(rel: &str) -> Vec<NodeSpec> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    assert!(path.exists(), "fixture missing: {}", rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    serde_json::from_str(&input).expect("fixture parse failed")
}

fn nodes_of(specs: &[NodeSpec]) -> Vec<Node> {
    specs.iter().cloned().map(Node::from).collect()
}

/// Deterministic pseudo-random tree: every node hangs under an earlier one.
fn generated_tree(count: usize) -> Vec<Node> {
    let mut nodes = vec![Node::new("n0", "Root", NodeKind::Root)];
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    for i in 1..count {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let parent = (state >> 33) as usize % i;
        let kind = if parent == 0 {
            NodeKind::Phase
        } else {
            NodeKind::Task
        };
        nodes.push(Node::new(format!("n{i}"), format!("Node {i}"), kind).with_parent(format!("n{parent}")));
    }
    nodes
}

fn assert_layout_invariants(nodes: &[Node], layout: &Layout, config: &LayoutConfig, name: &str) {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for node in nodes {
        if let Some(parent) = node.parent_id.as_deref()
            && layout.contains(parent)
            && layout.contains(&node.id)
        {
            children.entry(parent).or_default().push(&node.id);
        }
    }

    for placed in layout.nodes.values() {
        assert_eq!(
            placed.y,
            placed.depth as f32 * config.level_height,
            "{name}: {} y does not match depth",
            placed.id
        );
        assert!(
            placed.reserved_width() >= config.leaf_width(),
            "{name}: {} reserves less than one node",
            placed.id
        );
    }

    for (parent, kids) in &children {
        let parent_layout = layout.get(parent).unwrap();
        for pair in kids.windows(2) {
            let left = layout.get(pair[0]).unwrap();
            let right = layout.get(pair[1]).unwrap();
            assert!(
                left.span_end <= right.span_start,
                "{name}: siblings {} and {} overlap",
                left.id,
                right.id
            );
            assert!(left.x < right.x, "{name}: sibling order not preserved");
            assert!(
                right.x - left.x >= config.leaf_width(),
                "{name}: siblings {} and {} closer than one node",
                left.id,
                right.id
            );
        }
        let min_x = kids
            .iter()
            .map(|k| layout.get(k).unwrap().x)
            .fold(f32::MAX, f32::min);
        let max_x = kids
            .iter()
            .map(|k| layout.get(k).unwrap().x)
            .fold(f32::MIN, f32::max);
        assert!(
            parent_layout.x >= min_x && parent_layout.x <= max_x,
            "{name}: parent {} not centred over its children",
            parent
        );
        for kid in kids {
            let child = layout.get(kid).unwrap();
            assert_eq!(child.depth, parent_layout.depth + 1, "{name}: depth of {kid}");
            assert!(child.span_start >= parent_layout.span_start);
            assert!(child.span_end <= parent_layout.span_end);
        }
    }
}

#[test]
fn layout_all_fixtures() {
    let config = LayoutConfig::default();
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        ("campaign.json", "1", 4),
        ("product_launch.json", "root", 12),
        ("deep_chain.json", "a", 6),
        ("dangling.json", "1", 2),
    ];

    for (rel, root, positioned) in candidates {
        let nodes = nodes_of(&load_fixture(rel));
        let layout = compute_layout(&nodes, root, &config).expect("layout failed");
        assert_eq!(layout.len(), positioned, "{rel}: positioned count");
        assert_layout_invariants(&nodes, &layout, &config, rel);

        let again = compute_layout(&nodes, root, &config).unwrap();
        assert_eq!(layout, again, "{rel}: layout is not deterministic");
    }
}

#[test]
fn campaign_example_scenario() {
    let config = LayoutConfig::default();
    let nodes = nodes_of(&load_fixture("campaign.json"));
    let layout = compute_layout(&nodes, "1", &config).unwrap();
    let pos = |id: &str| layout.position_of(id).unwrap();

    assert_eq!(pos("1").y, 150.0);
    assert_eq!(pos("2").y, 300.0);
    assert_eq!(pos("3").y, 300.0);
    assert_eq!(pos("4").y, 450.0);
    assert!(pos("2").x < pos("3").x);

    let left = layout.get("2").unwrap();
    let right = layout.get("3").unwrap();
    let midpoint = (left.span_start + right.span_end - config.padding) / 2.0;
    assert_eq!(pos("1").x, midpoint);
}

#[test]
fn generated_tree_keeps_invariants() {
    let config = LayoutConfig::default();
    let nodes = generated_tree(300);
    let layout = compute_layout(&nodes, "n0", &config).unwrap();
    assert_eq!(layout.len(), 300);
    assert_layout_invariants(&nodes, &layout, &config, "generated");
    let leaves = nodes
        .iter()
        .filter(|n| !nodes.iter().any(|c| c.parent_id.as_deref() == Some(n.id.as_str())))
        .count();
    assert_eq!(layout.width, leaves as f32 * config.leaf_width());
}

#[test]
fn layout_ignores_prior_manual_placement() {
    let specs = load_fixture("product_launch.json");
    let mut controller = InteractionController::load(specs, Config::default()).unwrap();
    let initial = controller.store().snapshot();

    controller.begin_drag("api");
    controller.update_drag(Point::new(-300.0, 900.0));
    controller.end_drag();
    controller.begin_drag("root");
    controller.update_drag(Point::new(5.0, 5.0));
    controller.pointer_leave();
    assert_ne!(controller.store().snapshot(), initial);

    controller.reorganize().unwrap();
    assert_eq!(controller.store().snapshot(), initial);
}

#[test]
fn add_child_then_reorganize_has_no_overlap() {
    let config = Config::default();
    let specs = load_fixture("product_launch.json");
    let mut controller = InteractionController::load(specs, config.clone()).unwrap();
    let new_ids: Vec<String> = ["api", "api", "design", "press", "root"]
        .iter()
        .map(|parent| controller.add_child(parent).unwrap())
        .collect();

    let layout = controller.reorganize().unwrap();
    assert_eq!(layout.len(), 17);
    for id in &new_ids {
        assert!(layout.contains(id), "new node {id} not positioned");
    }
    assert_layout_invariants(controller.store().nodes(), &layout, &config.layout, "grown");
}

#[test]
fn drag_mutates_only_the_dragged_node() {
    let specs = load_fixture("product_launch.json");
    let mut controller = InteractionController::load(specs, Config::default()).unwrap();
    controller.set_zoom(-0.5);
    controller.pan_by(40.0, -20.0);
    let before = controller.store().snapshot();

    controller.begin_drag("billing");
    for step in 0..10 {
        controller.update_drag(Point::new(100.0 + step as f32 * 3.0, 200.0));
    }
    controller.end_drag();

    let after = controller.store().snapshot();
    for (old, new) in before.iter().zip(after.iter()) {
        if old.id == "billing" {
            assert_eq!(new.position(), Some(Point::new(174.0, 440.0)));
            assert!(new.is_manually_placed());
        } else {
            assert_eq!(old, new, "{} changed during drag", old.id);
        }
    }
}

#[test]
fn zoom_saturates_at_both_bounds() {
    let mut controller = InteractionController::load(load_fixture("campaign.json"), Config::default()).unwrap();
    for _ in 0..50 {
        controller.set_zoom(0.3);
    }
    assert_eq!(controller.scale(), 2.0);
    assert_eq!(controller.set_zoom(-1e9), 0.2);
    assert_eq!(controller.set_zoom(1e9), 2.0);
}

#[test]
fn dangling_references_are_disconnected_and_unpositioned() {
    let specs = load_fixture("dangling.json");
    let controller = InteractionController::load(specs, Config::default()).unwrap();
    let store = controller.store();
    assert_eq!(store.root_id(), Some("1"));

    for id in ["3", "4", "5"] {
        assert_eq!(store.node(id).unwrap().position(), None, "{id} positioned");
    }
    let edges = controller.edges();
    assert_eq!(edges.len(), 1);
    assert!(edges.iter().all(|e| e.to != "3" && e.from != "3"));
}

#[test]
fn cyclic_parent_chain_is_a_structural_error() {
    let specs = load_fixture("cycle.json");
    let mut store = GraphStore::import(specs).unwrap();
    assert_eq!(store.root_id(), None);
    assert!(store.set_root("a"));
    let mut controller = InteractionController::new(store, Config::default());
    let err = controller.reorganize().unwrap_err();
    assert!(err.is_structural());
    assert!(matches!(err, LayoutError::Cycle { .. }));
    assert!(controller.edges().is_empty());
}

#[test]
fn edges_track_every_position_change() {
    let specs = load_fixture("campaign.json");
    let mut controller = InteractionController::load(specs, Config::default()).unwrap();
    let half = controller.config().layout.node_height / 2.0;

    controller.begin_drag("1");
    controller.update_drag(Point::new(0.0, 0.0));
    let edges = controller.edges();
    assert_eq!(edges.len(), 3);
    for edge in edges.iter().filter(|e| e.from == "1") {
        assert_eq!(edge.curve.start, Point::new(0.0, half));
    }
    controller.end_drag();

    controller.reorganize().unwrap();
    let root = controller.store().node("1").unwrap().position().unwrap();
    for edge in controller.edges().iter().filter(|e| e.from == "1") {
        assert_eq!(edge.curve.start, root.offset(0.0, half));
    }
}

#[test]
fn deep_parent_chain_lays_out_without_exhausting_the_stack() {
    let config = Config::default();
    let depth = 20_000;
    let specs: Vec<NodeSpec> = (0..depth)
        .map(|i| {
            let spec = NodeSpec::new(format!("n{i}"), NodeKind::Task);
            if i == 0 {
                spec
            } else {
                spec.parent(format!("n{}", i - 1))
            }
        })
        .collect();

    let controller = InteractionController::load(specs, config.clone()).unwrap();
    let layout = compute_layout(controller.store().nodes(), "n0", &config.layout).unwrap();
    assert_eq!(layout.len(), depth);
    assert_eq!(layout.width, config.layout.leaf_width());
    let leaf = controller.store().node("n19999").unwrap().position().unwrap();
    let root = controller.store().node("n0").unwrap().position().unwrap();
    assert_eq!(leaf.x, root.x);
    assert_eq!(leaf.y, depth as f32 * config.layout.level_height);
    assert_eq!(controller.edges().len(), depth - 1);
}
