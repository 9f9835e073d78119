use mindmap_engine::config::{Config, parse_config};
use mindmap_engine::layout_dump::GraphDump;
use mindmap_engine::{GraphStore, InteractionController, NodeSpec, Point};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionOptions {
    root: Option<String>,
    config: Option<serde_json::Value>,
}

fn build_controller(nodes_json: &str, options: SessionOptions) -> Result<InteractionController, String> {
    let specs: Vec<NodeSpec> = serde_json::from_str(nodes_json).map_err(|error| error.to_string())?;
    let config = match options.config {
        Some(raw) => parse_config(&raw.to_string()).map_err(|error| format!("{error:#}"))?,
        None => Config::default(),
    };
    config.validate().map_err(|error| error.to_string())?;
    let mut store = GraphStore::import(specs).map_err(|error| error.to_string())?;
    if let Some(root) = options.root.as_deref()
        && !store.set_root(root)
    {
        return Err(format!("root node {root:?} not found"));
    }
    let mut controller = InteractionController::new(store, config);
    if !controller.store().is_empty() {
        controller.reorganize().map_err(|error| error.to_string())?;
    }
    Ok(controller)
}

fn dump_json(controller: &InteractionController) -> Result<String, String> {
    serde_json::to_string(&GraphDump::from_controller(controller)).map_err(|error| error.to_string())
}

/// One editable mind map. The host routes pointer and keyboard events here
/// and redraws from `graph()` whenever `revision()` changes.
#[wasm_bindgen]
pub struct MindmapSession {
    controller: InteractionController,
}

#[wasm_bindgen]
impl MindmapSession {
    #[wasm_bindgen(constructor)]
    pub fn new(nodes_json: &str, options_json: Option<String>) -> Result<MindmapSession, JsValue> {
        let options = if let Some(raw_options) = options_json {
            serde_json::from_str::<SessionOptions>(&raw_options)
                .map_err(|error| JsValue::from_str(&error.to_string()))?
        } else {
            SessionOptions::default()
        };
        let controller = build_controller(nodes_json, options).map_err(|error| JsValue::from_str(&error))?;
        Ok(MindmapSession { controller })
    }

    pub fn graph(&self) -> Result<String, JsValue> {
        dump_json(&self.controller).map_err(|error| JsValue::from_str(&error))
    }

    pub fn revision(&self) -> f64 {
        self.controller.store().revision() as f64
    }

    #[wasm_bindgen(js_name = beginDrag)]
    pub fn begin_drag(&mut self, node_id: &str) -> bool {
        self.controller.begin_drag(node_id)
    }

    #[wasm_bindgen(js_name = updateDrag)]
    pub fn update_drag(&mut self, screen_x: f32, screen_y: f32) -> bool {
        self.controller.update_drag(Point::new(screen_x, screen_y))
    }

    #[wasm_bindgen(js_name = endDrag)]
    pub fn end_drag(&mut self) -> bool {
        self.controller.end_drag()
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) -> bool {
        self.controller.pointer_leave()
    }

    #[wasm_bindgen(js_name = addChild)]
    pub fn add_child(&mut self, parent_id: &str) -> Option<String> {
        self.controller.add_child(parent_id)
    }

    #[wasm_bindgen(js_name = beginEdit)]
    pub fn begin_edit(&mut self, node_id: &str) -> bool {
        self.controller.begin_edit(node_id)
    }

    #[wasm_bindgen(js_name = updateEdit)]
    pub fn update_edit(&mut self, text: &str) -> bool {
        self.controller.update_edit(text)
    }

    #[wasm_bindgen(js_name = commitEdit)]
    pub fn commit_edit(&mut self) -> bool {
        self.controller.commit_edit()
    }

    #[wasm_bindgen(js_name = cancelEdit)]
    pub fn cancel_edit(&mut self) -> bool {
        self.controller.cancel_edit()
    }

    #[wasm_bindgen(js_name = renameNode)]
    pub fn rename_node(&mut self, node_id: &str, label: &str) -> bool {
        self.controller.rename_node(node_id, label)
    }

    pub fn reorganize(&mut self) -> Result<(), JsValue> {
        self.controller
            .reorganize()
            .map(|_| ())
            .map_err(|error| JsValue::from_str(&error.to_string()))
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, delta: f32) -> f32 {
        self.controller.set_zoom(delta)
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&mut self) {
        self.controller.reset_zoom();
    }

    #[wasm_bindgen(js_name = panBy)]
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.controller.pan_by(dx, dy);
    }

    #[wasm_bindgen(js_name = nodeAt)]
    pub fn node_at(&self, screen_x: f32, screen_y: f32) -> Option<String> {
        self.controller
            .node_at(Point::new(screen_x, screen_y))
            .map(str::to_string)
    }
}
