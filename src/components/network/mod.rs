//! Network graph widget.
//!
//! Turns a fetched [`GraphDocument`] into two indexed [`DataSet`]s and renders
//! them on an HTML canvas with:
//! - Force-directed layout via the `force_graph` simulation, relaxed before the
//!   first frame and fitted to the viewport
//! - Optional hierarchical placement
//! - Dot and image node shapes, node and edge labels, group colors
//! - Hover highlighting, node dragging, panning and zooming
//!
//! # Example
//!
//! ```ignore
//! let document: GraphDocument = serde_json::from_str(json)?;
//! let data = build_network(document)?;
//!
//! view! { <NetworkCanvas data=data options=NetworkOptions::default() /> }
//! ```

mod component;
mod dataset;
mod graph;
pub mod layout;
mod normalize;
pub mod options;
mod render;
mod state;
pub mod theme;
mod types;
mod validate;

pub use component::NetworkCanvas;
pub use dataset::{DataSet, DuplicateKey};
pub use graph::{NetworkData, build_network};
pub use normalize::normalize_node;
pub use options::NetworkOptions;
pub use types::{Edge, GraphDocument, Node, NodeId, NodeShape, RenderNode};
pub use validate::validate;
