//! Turns discrete pointer and keyboard events into [`GraphStore`] mutations.
//!
//! Operations that name an unknown node are silent no-ops: they report
//! `false` / `None` and leave the store untouched. Only [`reorganize`]
//! surfaces an error, and only for structural problems in the graph.
//!
//! [`reorganize`]: InteractionController::reorganize

use uuid::Uuid;

use crate::config::Config;
use crate::connection::{Edge, edges};
use crate::ir::{Node, NodeKind, NodeSpec, Point};
use crate::layout::{Layout, LayoutError};
use crate::store::{CommittedEdit, GraphError, GraphStore};

#[derive(Debug, Clone)]
pub struct InteractionController {
    store: GraphStore,
    config: Config,
}

impl InteractionController {
    pub fn new(store: GraphStore, config: Config) -> Self {
        let store = store.with_viewport(&config.viewport);
        Self { store, config }
    }

    /// Imports generator output and computes the initial positions.
    pub fn load(specs: Vec<NodeSpec>, config: Config) -> Result<Self, GraphError> {
        config.validate()?;
        let store = GraphStore::import(specs)?;
        let mut controller = Self::new(store, config);
        if !controller.store.is_empty() {
            controller.reorganize()?;
        }
        Ok(controller)
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn into_store(self) -> GraphStore {
        self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_root(&mut self, node_id: &str) -> bool {
        self.store.set_root(node_id)
    }

    pub fn begin_drag(&mut self, node_id: &str) -> bool {
        let Some(node) = self.store.node_mut(node_id) else {
            tracing::debug!(node_id, "begin_drag ignored: unknown node");
            return false;
        };
        if node.override_position.is_none() {
            node.override_position = node.computed;
        }
        node.manually_placed = true;
        self.store.viewport_mut().active_drag = Some(node_id.to_string());
        self.store.touch();
        true
    }

    /// Moves the dragged node to the canvas point under `screen`. O(1).
    pub fn update_drag(&mut self, screen: Point) -> bool {
        let viewport = self.store.viewport();
        let Some(node_id) = viewport.active_drag.clone() else {
            return false;
        };
        let canvas = viewport.screen_to_canvas(screen);
        let Some(node) = self.store.node_mut(&node_id) else {
            return false;
        };
        node.override_position = Some(canvas);
        self.store.touch();
        true
    }

    pub fn end_drag(&mut self) -> bool {
        let ended = self.store.viewport_mut().active_drag.take().is_some();
        if ended {
            self.store.touch();
        }
        ended
    }

    /// Same as pointer-up: the current position is kept.
    pub fn pointer_leave(&mut self) -> bool {
        self.end_drag()
    }

    pub fn active_drag(&self) -> Option<&str> {
        self.store.viewport().active_drag.as_deref()
    }

    /// Appends a task under `parent_id` one level below the parent. No re-layout.
    pub fn add_child(&mut self, parent_id: &str) -> Option<String> {
        let Some(parent) = self.store.node(parent_id) else {
            tracing::debug!(parent_id, "add_child ignored: unknown parent");
            return None;
        };
        let position = parent
            .position()
            .map(|p| p.offset(0.0, self.config.layout.level_height));

        let id = self.fresh_id();
        let mut node = Node::new(
            id.clone(),
            self.config.interaction.new_node_label.clone(),
            NodeKind::Task,
        )
        .with_parent(parent_id);
        node.override_position = position;
        self.store.push(node);
        tracing::debug!(parent_id, child = %id, "child added");
        Some(id)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().simple().to_string();
            if !self.store.contains(&id) {
                return id;
            }
        }
    }

    pub fn editing_node_id(&self) -> Option<&str> {
        self.store.viewport().editing_node_id()
    }

    /// Opens the inline editor on `node_id`, committing any other open edit.
    pub fn begin_edit(&mut self, node_id: &str) -> bool {
        let Some(label) = self.store.node(node_id).map(|n| n.label.clone()) else {
            tracing::debug!(node_id, "begin_edit ignored: unknown node");
            return false;
        };
        if let Some(previous) = self.store.viewport_mut().edit.enter(node_id, &label) {
            self.apply_edit(previous);
        }
        self.store.touch();
        true
    }

    pub fn update_edit(&mut self, text: &str) -> bool {
        let updated = self.store.viewport_mut().edit.set_draft(text);
        if updated {
            self.store.touch();
        }
        updated
    }

    pub fn commit_edit(&mut self) -> bool {
        match self.store.viewport_mut().edit.commit() {
            Some(edit) => {
                self.apply_edit(edit);
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) -> bool {
        let cancelled = self.store.viewport_mut().edit.cancel();
        if cancelled {
            self.store.touch();
        }
        cancelled
    }

    /// Sets the label directly. An edit open on another node is committed
    /// first; an edit open on this node is superseded.
    pub fn rename_node(&mut self, node_id: &str, new_label: &str) -> bool {
        if !self.store.contains(node_id) {
            tracing::debug!(node_id, "rename ignored: unknown node");
            return false;
        }
        let edit = &mut self.store.viewport_mut().edit;
        if edit.node_id() == Some(node_id) {
            edit.cancel();
        } else if let Some(previous) = edit.commit() {
            self.apply_edit(previous);
        }
        self.apply_edit(CommittedEdit {
            node_id: node_id.to_string(),
            label: new_label.to_string(),
        });
        true
    }

    fn apply_edit(&mut self, edit: CommittedEdit) {
        if let Some(node) = self.store.node_mut(&edit.node_id) {
            node.label = edit.label;
            self.store.touch();
        }
    }

    /// Full re-layout; discards every manual placement.
    pub fn reorganize(&mut self) -> Result<Layout, LayoutError> {
        match self.store.layout(&self.config.layout) {
            Ok(layout) => {
                tracing::info!(
                    positioned = layout.len(),
                    total = self.store.len(),
                    "re-organized"
                );
                Ok(layout)
            }
            Err(err) => {
                tracing::warn!(error = %err, "re-organize failed");
                Err(err)
            }
        }
    }

    pub fn scale(&self) -> f32 {
        self.store.viewport().scale
    }

    pub fn set_zoom(&mut self, delta: f32) -> f32 {
        if delta.is_finite() {
            let viewport = &self.config.viewport;
            let scale = viewport.clamp_scale(self.store.viewport().scale + delta);
            self.store.viewport_mut().scale = scale;
            self.store.touch();
        }
        self.scale()
    }

    pub fn reset_zoom(&mut self) {
        self.store.viewport_mut().scale = self.config.viewport.default_scale;
        self.store.touch();
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        let viewport = self.store.viewport_mut();
        viewport.offset = viewport.offset.offset(dx, dy);
        self.store.touch();
    }

    pub fn set_offset(&mut self, offset: Point) {
        self.store.viewport_mut().offset = offset;
        self.store.touch();
    }

    /// Top-most node whose box contains the screen point.
    pub fn node_at(&self, screen: Point) -> Option<&str> {
        let canvas = self.store.viewport().screen_to_canvas(screen);
        let half_w = self.config.layout.node_width / 2.0;
        let half_h = self.config.layout.node_height / 2.0;
        self.store
            .nodes()
            .iter()
            .rev()
            .find(|node| {
                node.position().is_some_and(|p| {
                    (canvas.x - p.x).abs() <= half_w && (canvas.y - p.y).abs() <= half_h
                })
            })
            .map(|node| node.id.as_str())
    }

    pub fn edges(&self) -> Vec<Edge> {
        edges(&self.store, &self.config)
    }
}
