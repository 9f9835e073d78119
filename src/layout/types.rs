use std::collections::BTreeMap;

use crate::ir::{Node, Point};

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    /// Distance from the root, with the root at depth 1.
    pub depth: usize,
    /// Left edge of the horizontal span reserved for this node's subtree.
    pub span_start: f32,
    /// Exclusive right edge; includes the trailing padding.
    pub span_end: f32,
}

impl NodeLayout {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn reserved_width(&self) -> f32 {
        self.span_end - self.span_start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub root_id: String,
    pub nodes: BTreeMap<String, NodeLayout>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn get(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.get(id)
    }

    pub fn position_of(&self, id: &str) -> Option<Point> {
        self.nodes.get(id).map(NodeLayout::position)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids from `nodes` the layout never reached (orphans, dangling parents,
    /// secondary roots), in input order.
    pub fn unpositioned<'a>(&self, nodes: &'a [Node]) -> Vec<&'a str> {
        nodes
            .iter()
            .filter(|node| !self.nodes.contains_key(&node.id))
            .map(|node| node.id.as_str())
            .collect()
    }
}
