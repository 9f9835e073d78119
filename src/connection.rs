use std::collections::HashMap;

use crate::config::{Config, ConnectionConfig, LayoutConfig};
use crate::ir::{Node, Point};
use crate::store::GraphStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

impl CubicBezier {
    /// S-curve leaving `start` downwards and entering `end` from above.
    pub fn vertical(start: Point, end: Point, control_offset: f32) -> Self {
        Self {
            start,
            c1: start.offset(0.0, control_offset),
            c2: end.offset(0.0, -control_offset),
            end,
        }
    }

    pub fn point_at(&self, t: f32) -> Point {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x + b * self.c1.x + c * self.c2.x + d * self.end.x,
            a * self.start.y + b * self.c1.y + c * self.c2.y + d * self.end.y,
        )
    }

    pub fn points(&self) -> [Point; 4] {
        [self.start, self.c1, self.c2, self.end]
    }

    pub fn svg_path(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            fmt_num(self.start.x),
            fmt_num(self.start.y),
            fmt_num(self.c1.x),
            fmt_num(self.c1.y),
            fmt_num(self.c2.x),
            fmt_num(self.c2.y),
            fmt_num(self.end.x),
            fmt_num(self.end.y)
        )
    }
}

fn fmt_num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub curve: CubicBezier,
}

/// Derives one edge per resolvable parent/child pair from current positions.
/// Nothing is cached; call again after any mutation.
pub fn edges(store: &GraphStore, config: &Config) -> Vec<Edge> {
    edges_for(store.nodes(), &config.layout, &config.connection)
}

pub fn edges_for(
    nodes: &[Node],
    layout: &LayoutConfig,
    connection: &ConnectionConfig,
) -> Vec<Edge> {
    let by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let half_height = layout.node_height / 2.0;

    let mut edges = Vec::new();
    for child in nodes {
        let Some(parent_id) = child.parent_id.as_deref() else {
            continue;
        };
        let Some(parent) = by_id.get(parent_id) else {
            continue;
        };
        let (Some(from), Some(to)) = (parent.position(), child.position()) else {
            continue;
        };
        edges.push(Edge {
            from: parent.id.clone(),
            to: child.id.clone(),
            curve: CubicBezier::vertical(
                from.offset(0.0, half_height),
                to.offset(0.0, -half_height),
                connection.control_offset,
            ),
        });
    }
    edges
}
