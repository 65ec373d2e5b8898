//! Per-node shape selection.

use super::types::{Node, NodeShape, RenderNode};

/// Picks the draw shape for a node: `image` when it carries an image URL,
/// otherwise `dot` with the image explicitly cleared.
///
/// A `shape` attribute sent by the data source is dropped; the derived one wins.
pub fn normalize_node(node: Node) -> RenderNode {
	let Node {
		id,
		label,
		group,
		image,
		mut extra,
	} = node;
	extra.remove("shape");

	let (shape, image) = match image {
		Some(url) => (NodeShape::Image, Some(url)),
		None => (NodeShape::Dot, None),
	};

	RenderNode {
		id,
		label,
		group,
		shape,
		image,
		extra,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn node(value: serde_json::Value) -> Node {
		serde_json::from_value(value).unwrap()
	}

	#[test]
	fn test_image_node_keeps_url() {
		let rendered = normalize_node(node(json!({"id": 2, "label": "B", "image": "http://x/i.png"})));

		assert_eq!(rendered.shape, NodeShape::Image);
		assert_eq!(rendered.image.as_deref(), Some("http://x/i.png"));
		assert_eq!(rendered.label.as_deref(), Some("B"));
	}

	#[test]
	fn test_plain_node_becomes_dot() {
		let rendered = normalize_node(node(json!({"id": 1, "label": "A"})));

		assert_eq!(rendered.shape, NodeShape::Dot);
		assert_eq!(rendered.image, None);
	}

	#[test]
	fn test_null_image_becomes_dot() {
		let rendered = normalize_node(node(json!({"id": 1, "image": null, "shape": "image"})));

		assert_eq!(rendered.shape, NodeShape::Dot);
		assert_eq!(rendered.image, None);
		assert!(!rendered.extra.contains_key("shape"));
	}

	#[test]
	fn test_cleared_image_serializes_as_null() {
		let rendered = normalize_node(node(json!({"id": 1})));
		let value = serde_json::to_value(&rendered).unwrap();

		assert_eq!(value["shape"], "dot");
		assert!(value.as_object().unwrap().contains_key("image"));
		assert!(value["image"].is_null());
	}

	#[test]
	fn test_extra_attributes_pass_through() {
		let rendered = normalize_node(node(json!({
			"id": "sw1",
			"group": "switch",
			"title": "core",
			"level": 2
		})));

		assert_eq!(rendered.group.as_deref(), Some("switch"));
		let keys: Vec<&str> = rendered.extra.keys().map(String::as_str).collect();
		assert_eq!(keys, ["title", "level"]);
		assert_eq!(rendered.extra["level"], 2);
	}
}
