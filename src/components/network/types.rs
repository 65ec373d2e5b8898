//! Wire and render-time data structures for the network component.
//!
//! Nodes and edges are open records: the keys the renderer understands are
//! typed fields, everything else lands in `extra` and is passed through in
//! its original order.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identifier of a node. The data source may use numbers or strings.
///
/// Integers that fit `i64` become `Int`; any other JSON number (fractions,
/// integers beyond `i64`) is kept verbatim as `Num`. `1` and `1.0` are
/// therefore distinct ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
	Int(i64),
	Num(serde_json::Number),
	Str(String),
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NodeId::Int(n) => write!(f, "{n}"),
			NodeId::Num(n) => write!(f, "{n}"),
			NodeId::Str(s) => write!(f, "\"{s}\""),
		}
	}
}

impl From<i64> for NodeId {
	fn from(n: i64) -> Self {
		NodeId::Int(n)
	}
}

impl From<&str> for NodeId {
	fn from(s: &str) -> Self {
		NodeId::Str(s.to_string())
	}
}

/// A node as delivered by the data source.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Node {
	pub id: NodeId,
	#[serde(default)]
	pub label: Option<String>,
	/// Group name; nodes of a group share a palette color.
	#[serde(default)]
	pub group: Option<String>,
	/// Image URL. `null`, `""`, `false` and `0` all count as "no image".
	#[serde(default, deserialize_with = "image_url")]
	pub image: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

fn image_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	match Value::deserialize(deserializer)? {
		Value::Null | Value::Bool(false) => Ok(None),
		Value::String(s) if s.is_empty() => Ok(None),
		Value::String(s) => Ok(Some(s)),
		Value::Number(n) if n.as_f64() == Some(0.0) => Ok(None),
		other => Err(serde::de::Error::custom(format!(
			"image must be a URL string, got {other}"
		))),
	}
}

/// How a node is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
	#[default]
	Dot,
	Image,
}

/// A node after normalization, ready for the node [`DataSet`](super::DataSet).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderNode {
	pub id: NodeId,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub group: Option<String>,
	pub shape: NodeShape,
	/// Always serialized; `null` marks the image as explicitly cleared.
	pub image: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// A connection between two nodes. Never modified by the loader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
	pub from: NodeId,
	pub to: NodeId,
	/// Optional edge id; same number-or-string form as node ids.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<NodeId>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Full payload of the data endpoint.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphDocument {
	#[serde(default)]
	pub nodes: Vec<Node>,
	#[serde(default)]
	pub edges: Vec<Edge>,
}
