//! Structural checks run before a document is turned into data sets.

use std::collections::HashSet;

use super::types::GraphDocument;
use crate::error::GraphError;

/// Rejects repeated node ids and edges whose endpoints are not in the document.
pub fn validate(document: &GraphDocument) -> Result<(), GraphError> {
	let mut seen = HashSet::with_capacity(document.nodes.len());
	for node in &document.nodes {
		if !seen.insert(&node.id) {
			return Err(GraphError::DuplicateNodeId(node.id.clone()));
		}
	}

	for (i, edge) in document.edges.iter().enumerate() {
		for endpoint in [&edge.from, &edge.to] {
			if !seen.contains(endpoint) {
				let name = match &edge.id {
					Some(id) => id.to_string(),
					None => format!("#{i} ({} -> {})", edge.from, edge.to),
				};
				return Err(GraphError::DanglingEdge {
					edge: name,
					endpoint: endpoint.clone(),
				});
			}
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network::NodeId;
	use serde_json::json;

	fn doc(value: serde_json::Value) -> GraphDocument {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn test_valid_document_passes() {
		let d = doc(json!({
			"nodes": [{"id": 1}, {"id": 2}],
			"edges": [{"from": 1, "to": 2}, {"from": 2, "to": 2}]
		}));
		assert!(validate(&d).is_ok());
	}

	#[test]
	fn test_empty_document_passes() {
		assert!(validate(&GraphDocument::default()).is_ok());
	}

	#[test]
	fn test_duplicate_node_id() {
		let d = doc(json!({"nodes": [{"id": 1}, {"id": 2}, {"id": 1}]}));
		match validate(&d) {
			Err(GraphError::DuplicateNodeId(id)) => assert_eq!(id, NodeId::Int(1)),
			other => panic!("expected duplicate id error, got {other:?}"),
		}
	}

	#[test]
	fn test_number_and_string_ids_are_distinct() {
		let d = doc(json!({"nodes": [{"id": 1}, {"id": "1"}]}));
		assert!(validate(&d).is_ok());
	}

	#[test]
	fn test_dangling_edge_names_endpoint() {
		let d = doc(json!({
			"nodes": [{"id": 1}],
			"edges": [{"from": 1, "to": 5}]
		}));
		let err = validate(&d).unwrap_err();
		match &err {
			GraphError::DanglingEdge { endpoint, .. } => assert_eq!(*endpoint, NodeId::Int(5)),
			other => panic!("expected dangling edge error, got {other:?}"),
		}
		assert_eq!(err.to_string(), "edge #0 (1 -> 5) references unknown node 5");
	}
}
