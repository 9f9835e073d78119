use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Phase,
    #[default]
    Task,
}

impl NodeKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "root" => Some(Self::Root),
            "phase" => Some(Self::Phase),
            "task" => Some(Self::Task),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Phase => "phase",
            Self::Task => "task",
        }
    }
}

/// Canvas-space coordinate (or screen-space, depending on the caller).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Node descriptor as produced by an external extractor or by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub time_hint: Option<String>,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: None,
            kind,
            parent_id: None,
            time_hint: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn time_hint(mut self, hint: impl Into<String>) -> Self {
        self.time_hint = Some(hint.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub time_hint: Option<String>,
    /// Last position written by the layout engine.
    #[serde(default)]
    pub computed: Option<Point>,
    /// Manual placement from a drag; wins over `computed` until re-organize.
    #[serde(default)]
    pub override_position: Option<Point>,
    /// Set once a drag starts, even before the node has a position.
    #[serde(default)]
    pub manually_placed: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            parent_id: None,
            time_hint: None,
            computed: None,
            override_position: None,
            manually_placed: false,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn position(&self) -> Option<Point> {
        self.override_position.or(self.computed)
    }

    pub fn is_manually_placed(&self) -> bool {
        self.manually_placed || self.override_position.is_some()
    }
}

impl From<NodeSpec> for Node {
    fn from(spec: NodeSpec) -> Self {
        let label = spec.label.unwrap_or_else(|| spec.id.clone());
        Self {
            id: spec.id,
            label,
            kind: spec.kind,
            parent_id: spec.parent_id,
            time_hint: spec.time_hint,
            computed: None,
            override_position: None,
            manually_placed: false,
        }
    }
}
