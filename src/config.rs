use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Vertical distance between depths.
    pub level_height: f32,
    pub node_width: f32,
    /// Gap reserved after every subtree.
    pub padding: f32,
    /// Box height used for edge anchors and hit testing; the layout itself ignores it.
    pub node_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_height: 150.0,
            node_width: 220.0,
            padding: 40.0,
            node_height: 60.0,
        }
    }
}

impl LayoutConfig {
    pub fn leaf_width(&self) -> f32 {
        self.node_width + self.padding
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub default_scale: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 2.0,
            default_scale: 1.0,
        }
    }
}

impl ViewportConfig {
    /// Saturates at the bounds. Unlike `f32::clamp` this never panics, even
    /// for inverted or NaN bounds; the upper bound wins when they disagree.
    pub fn clamp_scale(&self, scale: f32) -> f32 {
        scale.max(self.min_scale).min(self.max_scale)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub control_offset: f32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            control_offset: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    pub new_node_label: String,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            new_node_label: "New Task".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
    pub connection: ConnectionConfig,
    pub interaction: InteractionConfig,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("scale bounds are inverted: min {min} > max {max}")]
    InvertedScale { min: f32, max: f32 },
    #[error("default scale {value} lies outside [{min}, {max}]")]
    DefaultScaleOutOfRange { value: f32, min: f32, max: f32 },
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let numeric = [
            ("layout.levelHeight", self.layout.level_height),
            ("layout.nodeWidth", self.layout.node_width),
            ("layout.padding", self.layout.padding),
            ("layout.nodeHeight", self.layout.node_height),
            ("viewport.minScale", self.viewport.min_scale),
            ("viewport.maxScale", self.viewport.max_scale),
            ("viewport.defaultScale", self.viewport.default_scale),
            ("connection.controlOffset", self.connection.control_offset),
        ];
        if let Some((field, value)) = numeric.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite { field, value });
        }

        let positive = [
            ("layout.levelHeight", self.layout.level_height),
            ("layout.nodeWidth", self.layout.node_width),
            ("layout.nodeHeight", self.layout.node_height),
            ("viewport.minScale", self.viewport.min_scale),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.layout.padding < 0.0 {
            return Err(ConfigError::Negative {
                field: "layout.padding",
                value: self.layout.padding,
            });
        }
        let viewport = &self.viewport;
        if viewport.min_scale > viewport.max_scale {
            return Err(ConfigError::InvertedScale {
                min: viewport.min_scale,
                max: viewport.max_scale,
            });
        }
        if viewport.default_scale < viewport.min_scale || viewport.default_scale > viewport.max_scale
        {
            return Err(ConfigError::DefaultScaleOutOfRange {
                value: viewport.default_scale,
                min: viewport.min_scale,
                max: viewport.max_scale,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    level_height: Option<f32>,
    node_width: Option<f32>,
    padding: Option<f32>,
    node_height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ViewportConfigFile {
    min_scale: Option<f32>,
    max_scale: Option<f32>,
    default_scale: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConnectionConfigFile {
    control_offset: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct InteractionConfigFile {
    new_node_label: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    layout: Option<LayoutConfigFile>,
    viewport: Option<ViewportConfigFile>,
    connection: Option<ConnectionConfigFile>,
    interaction: Option<InteractionConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let is_json5 = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);
    let config = if is_json5 {
        parse_config_json5(&contents)
    } else {
        parse_config(&contents)
    }
    .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    merge_config_file(parsed)
}

pub fn parse_config_json5(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    merge_config_file(parsed)
}

fn merge_config_file(parsed: ConfigFile) -> anyhow::Result<Config> {
    let mut config = Config::default();

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.level_height {
            config.layout.level_height = v;
        }
        if let Some(v) = layout.node_width {
            config.layout.node_width = v;
        }
        if let Some(v) = layout.padding {
            config.layout.padding = v;
        }
        if let Some(v) = layout.node_height {
            config.layout.node_height = v;
        }
    }

    if let Some(viewport) = parsed.viewport {
        if let Some(v) = viewport.min_scale {
            config.viewport.min_scale = v;
        }
        if let Some(v) = viewport.max_scale {
            config.viewport.max_scale = v;
        }
        if let Some(v) = viewport.default_scale {
            config.viewport.default_scale = v;
        }
    }

    if let Some(connection) = parsed.connection
        && let Some(v) = connection.control_offset
    {
        config.connection.control_offset = v;
    }

    if let Some(interaction) = parsed.interaction
        && let Some(v) = interaction.new_node_label
    {
        config.interaction.new_node_label = v;
    }

    config.validate()?;
    Ok(config)
}
