mod error;
mod tree;
pub(crate) mod types;
pub use error::LayoutError;
pub use types::*;
use tree::*;

use crate::config::LayoutConfig;
use crate::ir::Node;
use std::collections::{BTreeMap, HashMap, HashSet};

pub fn compute_layout(
    nodes: &[Node],
    root_id: &str,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    let _span = tracing::debug_span!("mindmap.layout", nodes = nodes.len(), root = root_id).entered();
    let layout = compute_tree_layout(nodes, root_id, config)?;
    tracing::debug!(
        positioned = layout.len(),
        unpositioned = nodes.len() - layout.len(),
        width = layout.width,
        height = layout.height,
        "layout computed"
    );
    Ok(layout)
}

/// Writes computed positions and discards every manual placement. Nodes the
/// layout did not reach lose their computed position.
pub fn apply_layout(nodes: &mut [Node], layout: &Layout) {
    for node in nodes.iter_mut() {
        node.computed = layout.position_of(&node.id);
        node.override_position = None;
        node.manually_placed = false;
    }
}

/// Lays out `nodes` in place and returns them, the `(nodes, rootId) -> nodes'` form.
pub fn layout_nodes(
    mut nodes: Vec<Node>,
    root_id: &str,
    config: &LayoutConfig,
) -> Result<Vec<Node>, LayoutError> {
    let layout = compute_layout(&nodes, root_id, config)?;
    apply_layout(&mut nodes, &layout);
    Ok(nodes)
}
