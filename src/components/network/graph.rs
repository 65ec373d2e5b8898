//! Turns a fetched document into the node and edge data sets.

use std::collections::HashSet;

use log::debug;

use super::dataset::DataSet;
use super::normalize::normalize_node;
use super::types::{Edge, GraphDocument, NodeId, RenderNode};
use super::validate::validate;
use crate::error::GraphError;

/// The two collections the network widget is built from.
#[derive(Clone, Debug, Default)]
pub struct NetworkData {
	pub nodes: DataSet<RenderNode>,
	pub edges: DataSet<Edge>,
}

/// Keys for the edge data set. Edges keep their own id; the rest get
/// `edge-<index>`, suffixed when that collides with an id already in use.
fn edge_keys(edges: &[Edge]) -> Vec<NodeId> {
	let mut taken: HashSet<NodeId> = edges.iter().filter_map(|e| e.id.clone()).collect();
	edges
		.iter()
		.enumerate()
		.map(|(index, edge)| match &edge.id {
			Some(id) => id.clone(),
			None => {
				let mut key = NodeId::Str(format!("edge-{index}"));
				let mut n = 1;
				while taken.contains(&key) {
					key = NodeId::Str(format!("edge-{index}-{n}"));
					n += 1;
				}
				taken.insert(key.clone());
				key
			}
		})
		.collect()
}

/// Validates the document, normalizes every node and indexes both collections.
pub fn build_network(document: GraphDocument) -> Result<NetworkData, GraphError> {
	validate(&document)?;

	let nodes = DataSet::from_items(
		document
			.nodes
			.into_iter()
			.map(normalize_node)
			.map(|node| (node.id.clone(), node)),
	)
	.map_err(|dup| GraphError::DuplicateNodeId(dup.0))?;

	let keys = edge_keys(&document.edges);
	let edges = DataSet::from_items(keys.into_iter().zip(document.edges))
	.map_err(|dup| GraphError::DuplicateEdgeId(dup.0))?;

	debug!(
		"network-graph: indexed {} nodes, {} edges",
		nodes.len(),
		edges.len()
	);
	Ok(NetworkData { nodes, edges })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network::NodeShape;
	use serde_json::json;

	fn doc(value: serde_json::Value) -> GraphDocument {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn test_sample_document() {
		let input = doc(json!({
			"nodes": [{"id": 1, "label": "A"}, {"id": 2, "label": "B", "image": "http://x/i.png"}],
			"edges": [{"from": 1, "to": 2}]
		}));
		let input_edge = input.edges[0].clone();

		let data = build_network(input).unwrap();

		assert_eq!(data.nodes.len(), 2);
		let a = data.nodes.get(&NodeId::Int(1)).unwrap();
		assert_eq!(a.shape, NodeShape::Dot);
		assert_eq!(a.image, None);
		let b = data.nodes.get(&NodeId::Int(2)).unwrap();
		assert_eq!(b.shape, NodeShape::Image);
		assert_eq!(b.image.as_deref(), Some("http://x/i.png"));

		assert_eq!(data.edges.len(), 1);
		assert_eq!(data.edges.iter().next().unwrap().1, &input_edge);
	}

	#[test]
	fn test_empty_document() {
		let data = build_network(doc(json!({"nodes": [], "edges": []}))).unwrap();
		assert!(data.nodes.is_empty());
		assert!(data.edges.is_empty());
	}

	#[test]
	fn test_node_ids_preserved() {
		let input = doc(json!({
			"nodes": [{"id": "c"}, {"id": 10, "image": ""}, {"id": "a", "image": "a.png"}]
		}));
		let expected: Vec<NodeId> = input.nodes.iter().map(|n| n.id.clone()).collect();

		let data = build_network(input).unwrap();

		let ids: Vec<NodeId> = data.nodes.ids().cloned().collect();
		assert_eq!(ids, expected);
	}

	#[test]
	fn test_edges_pass_through_unchanged() {
		let input = doc(json!({
			"nodes": [{"id": 1}, {"id": 2}],
			"edges": [
				{"from": 1, "to": 2, "label": "ethernet", "dashes": true},
				{"id": "uplink", "from": 2, "to": 1, "width": 4}
			]
		}));
		let expected = input.edges.clone();

		let data = build_network(input).unwrap();

		let edges: Vec<&Edge> = data.edges.iter().map(|(_, e)| e).collect();
		assert_eq!(edges, expected.iter().collect::<Vec<_>>());
		assert!(data.edges.contains(&NodeId::from("edge-0")));
		assert!(data.edges.contains(&NodeId::from("uplink")));
	}

	#[test]
	fn test_duplicate_edge_id() {
		let input = doc(json!({
			"nodes": [{"id": 1}],
			"edges": [{"id": 7, "from": 1, "to": 1}, {"id": 7, "from": 1, "to": 1}]
		}));
		assert!(matches!(
			build_network(input),
			Err(GraphError::DuplicateEdgeId(NodeId::Int(7)))
		));
	}

	#[test]
	fn test_generated_edge_key_skips_explicit_ids() {
		let input = doc(json!({
			"nodes": [{"id": 1}],
			"edges": [{"id": "edge-1", "from": 1, "to": 1}, {"from": 1, "to": 1}]
		}));
		let expected = input.edges.clone();

		let data = build_network(input).unwrap();

		let keys: Vec<NodeId> = data.edges.ids().cloned().collect();
		assert_eq!(keys, [NodeId::from("edge-1"), NodeId::from("edge-1-1")]);
		let edges: Vec<&Edge> = data.edges.iter().map(|(_, e)| e).collect();
		assert_eq!(edges, expected.iter().collect::<Vec<_>>());
	}

	#[test]
	fn test_invalid_document_is_rejected() {
		let input = doc(json!({"nodes": [{"id": 1}], "edges": [{"from": 1, "to": 2}]}));
		assert!(matches!(
			build_network(input),
			Err(GraphError::DanglingEdge { .. })
		));
	}
}
