#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod connection;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod store;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use connection::{CubicBezier, Edge, edges};
pub use interaction::InteractionController;
pub use ir::{Node, NodeKind, NodeSpec, Point};
pub use layout::{Layout, LayoutError, NodeLayout, apply_layout, compute_layout, layout_nodes};
pub use store::{EditState, GraphError, GraphStore, ViewportState};
