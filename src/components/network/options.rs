//! Static widget configuration.
//!
//! The defaults are the look and physics of the viewer. A page can override
//! any subset of them with a JSON block (see [`crate::loader::load_options`]);
//! keys use the camelCase names of the JSON form.

use force_graph::SimulationParameters;
use serde::Deserialize;
use serde_json::Value;

/// Complete widget configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkOptions {
	pub nodes: NodeOptions,
	pub edges: EdgeOptions,
	pub interaction: InteractionOptions,
	pub physics: PhysicsOptions,
	pub layout: LayoutOptions,
}

impl NetworkOptions {
	/// Parses an override block on top of the defaults.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}

/// Default node style, used where a node carries no override.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeOptions {
	/// Accepted for compatibility; normalization picks each node's shape.
	pub shape: super::NodeShape,
	/// Dot radius, and half the drawn width of image nodes.
	pub size: f64,
	pub font: FontOptions,
	pub border_width: f64,
	pub shadow: bool,
}

impl Default for NodeOptions {
	fn default() -> Self {
		Self {
			shape: super::NodeShape::Dot,
			size: 20.0,
			font: FontOptions::default(),
			border_width: 2.0,
			shadow: true,
		}
	}
}

/// Label font.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontOptions {
	pub size: f64,
	pub color: String,
}

impl Default for FontOptions {
	fn default() -> Self {
		Self {
			size: 14.0,
			color: "#000".to_string(),
		}
	}
}

impl FontOptions {
	pub fn css(&self) -> String {
		format!("{}px arial", self.size)
	}
}

/// Default edge style.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeOptions {
	pub width: f64,
	pub shadow: bool,
	pub color: EdgeColorOptions,
}

impl Default for EdgeOptions {
	fn default() -> Self {
		Self {
			width: 2.0,
			shadow: true,
			color: EdgeColorOptions::default(),
		}
	}
}

/// Edge colors. With `inherit` set, the endpoint node color replaces `color`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeColorOptions {
	pub color: String,
	pub highlight: String,
	pub hover: String,
	pub inherit: ColorInherit,
	pub opacity: f64,
}

impl Default for EdgeColorOptions {
	fn default() -> Self {
		Self {
			color: "#848484".to_string(),
			highlight: "#848484".to_string(),
			hover: "#848484".to_string(),
			inherit: ColorInherit::From,
			opacity: 0.7,
		}
	}
}

/// Which endpoint an edge takes its color from.
/// Written as `"from"`, `"to"`, `"both"` or `false`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub enum ColorInherit {
	None,
	From,
	To,
	/// Blend of both endpoint colors.
	Both,
}

impl TryFrom<Value> for ColorInherit {
	type Error = String;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Bool(false) | Value::Null => Ok(Self::None),
			Value::Bool(true) => Ok(Self::From),
			Value::String(s) => match s.as_str() {
				"from" => Ok(Self::From),
				"to" => Ok(Self::To),
				"both" => Ok(Self::Both),
				other => Err(format!("unknown color inherit mode \"{other}\"")),
			},
			other => Err(format!("invalid color inherit value {other}")),
		}
	}
}

/// Pointer interaction switches.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionOptions {
	/// Highlight nodes and their edges under the pointer.
	pub hover: bool,
	pub drag_nodes: bool,
	pub drag_view: bool,
	pub zoom_view: bool,
}

impl Default for InteractionOptions {
	fn default() -> Self {
		Self {
			hover: true,
			drag_nodes: true,
			drag_view: true,
			zoom_view: true,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum Solver {
	#[default]
	#[serde(rename = "barnesHut")]
	BarnesHut,
}

/// Force layout tuning.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsOptions {
	pub enabled: bool,
	pub solver: Solver,
	pub barnes_hut: BarnesHutOptions,
	pub stabilization: StabilizationOptions,
}

impl Default for PhysicsOptions {
	fn default() -> Self {
		Self {
			enabled: true,
			solver: Solver::BarnesHut,
			barnes_hut: BarnesHutOptions::default(),
			stabilization: StabilizationOptions::default(),
		}
	}
}

impl PhysicsOptions {
	/// Maps the Barnes-Hut parameters onto the `force_graph` simulation.
	///
	/// Repulsion is scaled down by 200 so the default gravitational constant
	/// lands on the charge the simulation is tuned for.
	pub fn simulation_parameters(&self) -> SimulationParameters {
		let bh = &self.barnes_hut;
		SimulationParameters {
			force_charge: (bh.gravitational_constant.abs() / 200.0) as f32,
			force_spring: bh.spring_constant as f32,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: (1.0 - bh.damping).clamp(0.0, 1.0) as f32,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarnesHutOptions {
	/// Repulsion strength; negative values repel.
	pub gravitational_constant: f64,
	/// Pull toward the center, applied per simulation step.
	pub central_gravity: f64,
	pub spring_length: f64,
	pub spring_constant: f64,
	/// Fraction of velocity lost per step.
	pub damping: f64,
	/// 0 lets nodes overlap, 1 keeps them a full diameter apart.
	pub avoid_overlap: f64,
}

impl Default for BarnesHutOptions {
	fn default() -> Self {
		Self {
			gravitational_constant: -30000.0,
			central_gravity: 0.3,
			spring_length: 95.0,
			spring_constant: 0.04,
			damping: 0.09,
			avoid_overlap: 0.1,
		}
	}
}

/// Relaxation run before the first frame.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StabilizationOptions {
	pub enabled: bool,
	/// Upper bound on relaxation steps.
	pub iterations: u32,
	/// Progress is reported every this many steps.
	pub update_interval: u32,
	/// Accepted for compatibility; every edge takes part in stabilization.
	pub only_dynamic_edges: bool,
	/// Zoom the view to the stabilized graph.
	pub fit: bool,
}

impl Default for StabilizationOptions {
	fn default() -> Self {
		Self {
			enabled: true,
			iterations: 1000,
			update_interval: 100,
			only_dynamic_edges: false,
			fit: true,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
	pub hierarchical: HierarchicalOptions,
}

/// Tree-style placement. Off unless enabled.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HierarchicalOptions {
	pub enabled: bool,
	pub level_separation: f64,
	pub node_spacing: f64,
	pub tree_spacing: f64,
	pub block_shifting: bool,
	pub edge_minimization: bool,
	/// Center each parent over its children.
	pub parent_centralization: bool,
	pub direction: Direction,
	pub sort_method: SortMethod,
}

impl Default for HierarchicalOptions {
	fn default() -> Self {
		Self {
			enabled: false,
			level_separation: 150.0,
			node_spacing: 100.0,
			tree_spacing: 200.0,
			block_shifting: true,
			edge_minimization: true,
			parent_centralization: true,
			direction: Direction::UpDown,
			sort_method: SortMethod::HubSize,
		}
	}
}

/// Axis along which hierarchy levels advance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum Direction {
	#[default]
	#[serde(rename = "UD")]
	UpDown,
	#[serde(rename = "DU")]
	DownUp,
	#[serde(rename = "LR")]
	LeftRight,
	#[serde(rename = "RL")]
	RightLeft,
}

/// How hierarchy levels are assigned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum SortMethod {
	/// Most connected nodes become roots.
	#[default]
	#[serde(rename = "hubsize")]
	HubSize,
	/// Levels follow edge direction, starting at nodes without incoming edges.
	#[serde(rename = "directed")]
	Directed,
}
