//! Error type shared by the loader and the network builder.

use thiserror::Error;

use crate::components::network::NodeId;

/// Everything that can stop a graph from reaching the screen.
#[derive(Debug, Error)]
pub enum GraphError {
	#[error("failed to fetch graph data from {url}: {reason}")]
	Fetch { url: String, reason: String },

	#[error("graph endpoint {url} answered with HTTP {status}")]
	Status { url: String, status: u16 },

	#[error("graph data is not a valid document: {0}")]
	Parse(#[from] serde_json::Error),

	#[error("node id {0} appears more than once")]
	DuplicateNodeId(NodeId),

	#[error("edge id {0} appears more than once")]
	DuplicateEdgeId(NodeId),

	#[error("edge {edge} references unknown node {endpoint}")]
	DanglingEdge { edge: String, endpoint: NodeId },

	#[error("no element with id \"{0}\" to render into")]
	MissingContainer(String),
}
