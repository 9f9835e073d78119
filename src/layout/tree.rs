use super::*;

struct TreeIndex<'a> {
    children: HashMap<&'a str, Vec<&'a str>>,
    known: HashSet<&'a str>,
}

fn build_tree_index(nodes: &[Node]) -> Result<TreeIndex<'_>, LayoutError> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut known: HashSet<&str> = HashSet::with_capacity(nodes.len());
    for node in nodes {
        if !known.insert(node.id.as_str()) {
            return Err(LayoutError::DuplicateId {
                id: node.id.clone(),
            });
        }
        if let Some(parent) = node.parent_id.as_deref() {
            children.entry(parent).or_default().push(node.id.as_str());
        }
    }
    Ok(TreeIndex { children, known })
}

struct SubtreeWalk<'a, 'c> {
    index: &'a TreeIndex<'a>,
    config: &'c LayoutConfig,
}

impl<'a> SubtreeWalk<'a, '_> {
    fn children_of(&self, node_id: &str) -> &'a [&'a str] {
        let index = self.index;
        index
            .children
            .get(node_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Pre-order from the root with depths. Fails on the first node reached twice.
    fn visit_order(&self, root_id: &'a str) -> Result<Vec<(&'a str, usize)>, LayoutError> {
        let mut visited: HashSet<&str> = HashSet::with_capacity(self.index.known.len());
        let mut order = Vec::with_capacity(self.index.known.len());
        let mut stack = vec![(root_id, 1)];
        while let Some((node_id, depth)) = stack.pop() {
            if !visited.insert(node_id) {
                tracing::warn!(node_id, "parent chain loops back; aborting layout");
                return Err(LayoutError::Cycle {
                    node_id: node_id.to_string(),
                });
            }
            order.push((node_id, depth));
            let children = self.children_of(node_id);
            stack.extend(children.iter().rev().map(|&child| (child, depth + 1)));
        }
        Ok(order)
    }

    /// Reserved width per subtree, children before parents.
    fn subtree_widths(&self, order: &[(&'a str, usize)]) -> HashMap<&'a str, f32> {
        let mut widths: HashMap<&str, f32> = HashMap::with_capacity(order.len());
        for &(node_id, _) in order.iter().rev() {
            let children = self.children_of(node_id);
            let width = if children.is_empty() {
                self.config.leaf_width()
            } else {
                children
                    .iter()
                    .map(|child| widths.get(child).copied().unwrap_or_default())
                    .sum()
            };
            widths.insert(node_id, width);
        }
        widths
    }

    fn place(
        &self,
        order: &[(&'a str, usize)],
        widths: &HashMap<&'a str, f32>,
    ) -> BTreeMap<String, NodeLayout> {
        let mut starts: HashMap<&str, f32> = HashMap::with_capacity(order.len());
        let mut placed = BTreeMap::new();
        for &(node_id, depth) in order {
            let start_x = starts.get(node_id).copied().unwrap_or_default();
            let occupied = widths.get(node_id).copied().unwrap_or_default();
            let children = self.children_of(node_id);

            let x = if children.is_empty() {
                start_x + self.config.node_width / 2.0
            } else {
                start_x + (occupied - self.config.padding) / 2.0
            };
            let mut cursor = start_x;
            for &child in children {
                starts.insert(child, cursor);
                cursor += widths.get(child).copied().unwrap_or_default();
            }

            placed.insert(
                node_id.to_string(),
                NodeLayout {
                    id: node_id.to_string(),
                    x,
                    y: depth as f32 * self.config.level_height,
                    depth,
                    span_start: start_x,
                    span_end: start_x + occupied,
                },
            );
        }
        placed
    }
}

/// Subtree-width layout: leaves reserve `node_width + padding`, parents sit
/// centred over the span their children reserved. Sizing runs bottom-up and
/// placement top-down over an explicit visit order, so depth is not bounded
/// by the call stack.
pub(super) fn compute_tree_layout(
    nodes: &[Node],
    root_id: &str,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    let index = build_tree_index(nodes)?;
    let Some(&root) = index.known.get(root_id) else {
        return Err(LayoutError::RootNotFound {
            root_id: root_id.to_string(),
        });
    };

    let walk = SubtreeWalk {
        index: &index,
        config,
    };
    let order = walk.visit_order(root)?;
    let widths = walk.subtree_widths(&order);
    let width = widths.get(root).copied().unwrap_or_default();
    let max_depth = order.iter().map(|&(_, depth)| depth).max().unwrap_or(1);

    Ok(Layout {
        root_id: root_id.to_string(),
        nodes: walk.place(&order, &widths),
        width,
        height: max_depth as f32 * config.level_height,
    })
}
