use crate::config::load_config;
use crate::interaction::InteractionController;
use crate::ir::NodeSpec;
use crate::layout_dump::{GraphDump, write_graph_dump};
use crate::store::GraphStore;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mmgraph", version, about = "Lay out a mind map node list")]
pub struct Args {
    /// Node list (JSON array of {id, label, kind, parentId?, timeHint?}) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config file (.json or .json5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Root node id. Defaults to the first parentless root-kind node.
    #[arg(short = 'r', long = "root")]
    pub root: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let specs = parse_node_list(&input)?;

    let mut store = GraphStore::import(specs)?;
    if let Some(root) = args.root.as_deref()
        && !store.set_root(root)
    {
        anyhow::bail!("root node {root:?} not found in input");
    }
    let mut controller = InteractionController::new(store, config);
    controller.reorganize()?;

    let dump = GraphDump::from_controller(&controller);
    if !dump.orphans.is_empty() {
        tracing::warn!(count = dump.orphans.len(), "nodes not reachable from the root");
    }
    write_graph_dump(args.output.as_deref(), &dump)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Accepts either a bare array or `{"nodes": [...]}` as emitted by extractors.
fn parse_node_list(input: &str) -> Result<Vec<NodeSpec>> {
    let value: serde_json::Value =
        serde_json::from_str(input).or_else(|_| json5::from_str(input))?;
    let list = match value {
        serde_json::Value::Object(mut map) => map
            .remove("nodes")
            .ok_or_else(|| anyhow::anyhow!("expected a node array or an object with \"nodes\""))?,
        other => other,
    };
    let specs: Vec<NodeSpec> = serde_json::from_value(list).context("invalid node list")?;
    if specs.is_empty() {
        return Err(anyhow::anyhow!("No nodes found in input"));
    }
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::NodeKind;

    #[test]
    fn parses_bare_array_and_wrapped_object() {
        let bare = r#"[{"id": "1", "kind": "root"}, {"id": "2", "parentId": "1"}]"#;
        let wrapped = r#"{"nodes": [{"id": "1", "kind": "root"}]}"#;
        let specs = parse_node_list(bare).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].kind, NodeKind::Root);
        assert_eq!(parse_node_list(wrapped).unwrap().len(), 1);
    }

    #[test]
    fn parses_json5_node_lists() {
        let input = "[\n  // generated\n  {id: 'a', kind: 'root'},\n]";
        let specs = parse_node_list(input).unwrap();
        assert_eq!(specs[0].id, "a");
    }

    #[test]
    fn rejects_empty_and_malformed_input() {
        assert!(parse_node_list("[]").is_err());
        assert!(parse_node_list(r#"{"items": []}"#).is_err());
        assert!(parse_node_list("not json").is_err());
    }
}
