use crate::connection::Edge;
use crate::interaction::InteractionController;
use crate::ir::NodeKind;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDump {
    pub root: Option<String>,
    pub scale: f32,
    pub offset: [f32; 2],
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    /// Nodes without a position, which presentation may hide.
    pub orphans: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub parent_id: Option<String>,
    pub time_hint: Option<String>,
    pub x: f32,
    pub y: f32,
    pub manually_placed: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    pub points: [[f32; 2]; 4],
    pub path: String,
}

impl From<&Edge> for EdgeDump {
    fn from(edge: &Edge) -> Self {
        EdgeDump {
            from: edge.from.clone(),
            to: edge.to.clone(),
            points: edge.curve.points().map(|p| [p.x, p.y]),
            path: edge.curve.svg_path(),
        }
    }
}

impl GraphDump {
    pub fn from_controller(controller: &InteractionController) -> Self {
        let store = controller.store();
        let mut nodes = Vec::with_capacity(store.len());
        let mut orphans = Vec::new();
        for node in store.nodes() {
            let Some(pos) = node.position() else {
                orphans.push(node.id.clone());
                continue;
            };
            nodes.push(NodeDump {
                id: node.id.clone(),
                label: node.label.clone(),
                kind: node.kind,
                parent_id: node.parent_id.clone(),
                time_hint: node.time_hint.clone(),
                x: pos.x,
                y: pos.y,
                manually_placed: node.is_manually_placed(),
            });
        }

        let viewport = store.viewport();
        GraphDump {
            root: store.root_id().map(str::to_string),
            scale: viewport.scale,
            offset: [viewport.offset.x, viewport.offset.y],
            nodes,
            edges: controller.edges().iter().map(EdgeDump::from).collect(),
            orphans,
        }
    }
}

pub fn write_graph_dump(path: Option<&Path>, dump: &GraphDump) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, dump)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, dump)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ir::NodeSpec;

    #[test]
    fn dump_lists_orphans_separately() {
        let controller = InteractionController::load(
            vec![
                NodeSpec::new("1", NodeKind::Root).label("Launch"),
                NodeSpec::new("2", NodeKind::Task).parent("1"),
                NodeSpec::new("x", NodeKind::Task).parent("gone"),
            ],
            Config::default(),
        )
        .unwrap();
        let dump = GraphDump::from_controller(&controller);
        assert_eq!(dump.root.as_deref(), Some("1"));
        assert_eq!(dump.nodes.len(), 2);
        assert_eq!(dump.orphans, vec!["x".to_string()]);
        assert_eq!(dump.edges.len(), 1);

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["nodes"][1]["parentId"], "1");
        assert_eq!(json["nodes"][0]["kind"], "root");
        assert_eq!(json["edges"][0]["points"][0][1], 180.0);
    }
}
