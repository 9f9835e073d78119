//! The node collection plus viewport state. Owned by the UI thread; every
//! mutation goes through [`crate::interaction::InteractionController`].

use std::collections::HashMap;

use crate::config::{ConfigError, LayoutConfig, ViewportConfig};
use crate::ir::{Node, NodeKind, NodeSpec, Point};
use crate::layout::{Layout, LayoutError, apply_layout, compute_layout};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("duplicate node id {id:?}")]
    DuplicateId { id: String },
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Inline label editor. At most one node is editable at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing { node_id: String, draft: String },
}

/// Label write produced when an edit is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedEdit {
    pub node_id: String,
    pub label: String,
}

impl EditState {
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Editing { node_id, .. } => Some(node_id),
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// Enters editing on `node_id`, committing whatever was being edited before.
    pub fn enter(&mut self, node_id: &str, current_label: &str) -> Option<CommittedEdit> {
        let previous = self.commit();
        *self = Self::Editing {
            node_id: node_id.to_string(),
            draft: current_label.to_string(),
        };
        previous
    }

    pub fn set_draft(&mut self, text: &str) -> bool {
        match self {
            Self::Idle => false,
            Self::Editing { draft, .. } => {
                text.clone_into(draft);
                true
            }
        }
    }

    pub fn commit(&mut self) -> Option<CommittedEdit> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Editing { node_id, draft } => Some(CommittedEdit {
                node_id,
                label: draft,
            }),
        }
    }

    pub fn cancel(&mut self) -> bool {
        let was_editing = self.is_editing();
        *self = Self::Idle;
        was_editing
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    pub scale: f32,
    /// Pan translation in screen pixels.
    pub offset: Point,
    pub active_drag: Option<String>,
    pub edit: EditState,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new(&ViewportConfig::default())
    }
}

impl ViewportState {
    pub fn new(config: &ViewportConfig) -> Self {
        Self {
            scale: config.default_scale,
            offset: Point::ZERO,
            active_drag: None,
            edit: EditState::Idle,
        }
    }

    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x * self.scale + self.offset.x,
            canvas.y * self.scale + self.offset.y,
        )
    }

    pub fn editing_node_id(&self) -> Option<&str> {
        self.edit.node_id()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    root_id: Option<String>,
    viewport: ViewportState,
    revision: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewport(mut self, config: &ViewportConfig) -> Self {
        self.viewport = ViewportState::new(config);
        self
    }

    /// Bulk import from an external generator. Positions are left empty.
    pub fn import(specs: impl IntoIterator<Item = NodeSpec>) -> Result<Self, GraphError> {
        Self::from_nodes(specs.into_iter().map(Node::from))
    }

    /// Restores a snapshot, keeping whatever positions it carries.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self, GraphError> {
        let mut store = Self::new();
        for node in nodes {
            if store.index.contains_key(&node.id) {
                return Err(GraphError::DuplicateId { id: node.id });
            }
            store.push(node);
        }
        store.root_id = store.find_default_root();
        tracing::info!(
            nodes = store.nodes.len(),
            root = store.root_id.as_deref().unwrap_or("<none>"),
            "graph imported"
        );
        Ok(store)
    }

    fn find_default_root(&self) -> Option<String> {
        let parentless = || self.nodes.iter().filter(|node| node.parent_id.is_none());
        parentless()
            .find(|node| node.kind == NodeKind::Root)
            .or_else(|| parentless().next())
            .map(|node| node.id.clone())
    }

    pub(crate) fn push(&mut self, node: Node) {
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        let idx = *self.index.get(id)?;
        self.nodes.get_mut(idx)
    }

    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.parent_id.as_deref() == Some(id))
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root_id.as_deref()
    }

    pub fn root(&self) -> Option<&Node> {
        self.root_id.as_deref().and_then(|id| self.node(id))
    }

    pub fn set_root(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            tracing::debug!(id, "set_root ignored: unknown node");
            return false;
        }
        self.root_id = Some(id.to_string());
        self.touch();
        true
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub(crate) fn viewport_mut(&mut self) -> &mut ViewportState {
        &mut self.viewport
    }

    pub fn snapshot(&self) -> Vec<Node> {
        self.nodes.clone()
    }

    /// Runs the layout engine over every node and replaces all positions.
    pub fn layout(&mut self, config: &LayoutConfig) -> Result<Layout, LayoutError> {
        let root_id = self.root_id.as_deref().ok_or(LayoutError::NoRoot)?;
        let layout = compute_layout(&self.nodes, root_id, config)?;
        apply_layout(&mut self.nodes, &layout);
        self.touch();
        Ok(layout)
    }
}
