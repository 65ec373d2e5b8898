//! Network simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-node display data, the
//! pan/zoom transform, drag state and hover highlighting. Forces the
//! simulation does not model itself (central gravity, overlap avoidance) are
//! applied on top after each step.

use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};
use log::{debug, info, warn};
use serde_json::{Map, Value};

use super::graph::NetworkData;
use super::layout::{hierarchical_layout, ring_layout};
use super::options::NetworkOptions;
use super::theme::{Color, GroupPalette, NodeColor};
use super::types::{NodeId, NodeShape};

/// Fixed step used by the animation loop and stabilization.
pub const STEP: f32 = 0.016;

/// Largest per-step movement (world units) still counted as motion.
const SETTLE_THRESHOLD: f64 = 0.05;

/// Screen margin kept around the graph when fitting the view.
const FIT_PADDING: f64 = 40.0;

/// Per-node display data attached to each node in the simulation.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: NodeId,
	pub label: Option<String>,
	pub shape: NodeShape,
	pub image: Option<String>,
	pub color: NodeColor,
	/// Dot radius in world units.
	pub size: f64,
}

/// A drawable edge, resolved to simulation indices.
#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub from: DefaultNodeIdx,
	pub to: DefaultNodeIdx,
	pub label: Option<String>,
	pub width: f64,
	pub dashes: bool,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

impl ViewTransform {
	pub const MIN_ZOOM: f64 = 0.1;
	pub const MAX_ZOOM: f64 = 10.0;

	/// Transform that shows `bounds` (min_x, min_y, max_x, max_y) centered in
	/// a `width` x `height` viewport.
	pub fn fit(bounds: Option<(f64, f64, f64, f64)>, width: f64, height: f64) -> Self {
		let Some((min_x, min_y, max_x, max_y)) = bounds else {
			return Self {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			};
		};
		let (bw, bh) = ((max_x - min_x).max(1.0), (max_y - min_y).max(1.0));
		let k = ((width - 2.0 * FIT_PADDING).max(1.0) / bw)
			.min((height - 2.0 * FIT_PADDING).max(1.0) / bh)
			.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		Self {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		}
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Hover highlighting with a short fade per node.
///
/// The hovered node and its direct neighbors form the target set; each node's
/// intensity eases toward 1.0 while in the set and back to 0.0 afterwards.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	pub hovered_node: Option<DefaultNodeIdx>,
	target_set: HashSet<DefaultNodeIdx>,
	intensity: HashMap<DefaultNodeIdx, f64>,
}

impl HighlightState {
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>, edges: &[EdgeInfo]) {
		if self.hovered_node == node {
			return;
		}
		self.hovered_node = node;
		self.target_set.clear();

		if let Some(idx) = node {
			self.target_set.insert(idx);
			for edge in edges {
				if edge.from == idx {
					self.target_set.insert(edge.to);
				} else if edge.to == idx {
					self.target_set.insert(edge.from);
				}
			}
		}
	}

	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 12.0;
		const FADE_OUT_SPEED: f64 = 6.0;

		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for &idx in &self.target_set {
			let value = self.intensity.entry(idx).or_insert(0.0);
			*value += (1.0 - *value) * fade_in;
		}
		let targets = &self.target_set;
		self.intensity.retain(|idx, value| {
			if !targets.contains(idx) {
				*value *= fade_out;
			}
			*value > 0.005
		});
	}

	pub fn is_target(&self, idx: DefaultNodeIdx) -> bool {
		self.target_set.contains(&idx)
	}

	pub fn node_intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// An edge is highlighted only while one of its ends is hovered.
	pub fn edge_intensity(&self, edge: &EdgeInfo) -> f64 {
		match self.hovered_node {
			Some(h) if h == edge.from || h == edge.to => self
				.node_intensity(edge.from)
				.min(self.node_intensity(edge.to)),
			_ => 0.0,
		}
	}
}

/// Outcome of the pre-render relaxation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stabilization {
	pub iterations: u32,
	pub settled: bool,
}

/// Core network state combining physics simulation with interaction tracking.
///
/// Created once when the widget mounts, then mutated each frame by the
/// animation loop.
pub struct NetworkState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeInfo>,
	pub options: NetworkOptions,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub highlight: HighlightState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	/// Iterations done by a stabilization run still in progress.
	pub stabilizing: Option<u32>,
}

fn number(extra: &Map<String, Value>, key: &str) -> Option<f64> {
	extra.get(key).and_then(Value::as_f64)
}

impl NetworkState {
	pub fn new(data: &NetworkData, options: &NetworkOptions, width: f64, height: f64) -> Self {
		let mut graph = ForceGraph::new(options.physics.simulation_parameters());
		let mut palette = GroupPalette::default();
		let mut id_to_idx = HashMap::with_capacity(data.nodes.len());

		let position: HashMap<&NodeId, usize> =
			data.nodes.ids().enumerate().map(|(i, id)| (id, i)).collect();
		let index_pairs: Vec<(usize, usize)> = data
			.edges
			.iter()
			.filter_map(|(_, e)| Some((*position.get(&e.from)?, *position.get(&e.to)?)))
			.collect();

		let hierarchical = options.layout.hierarchical.enabled;
		let placement = if hierarchical {
			hierarchical_layout(data.nodes.len(), &index_pairs, &options.layout.hierarchical)
		} else {
			ring_layout(data.nodes.len(), options.physics.barnes_hut.spring_length)
		};

		for ((id, node), &(x, y)) in data.nodes.iter().zip(&placement) {
			let color = node
				.extra
				.get("color")
				.and_then(Value::as_str)
				.and_then(Color::parse)
				.map(NodeColor::from_background)
				.unwrap_or_else(|| palette.color_for(node.group.as_deref()));

			let idx = graph.add_node(NodeData {
				x: x as f32,
				y: y as f32,
				mass: 10.0,
				is_anchor: hierarchical,
				user_data: NodeInfo {
					id: id.clone(),
					label: node.label.clone(),
					shape: node.shape,
					image: node.image.clone(),
					color,
					size: number(&node.extra, "size").unwrap_or(options.nodes.size),
				},
			});
			id_to_idx.insert(id.clone(), idx);
		}

		let mut edges = Vec::with_capacity(data.edges.len());
		for (key, edge) in data.edges.iter() {
			let (Some(&from), Some(&to)) = (id_to_idx.get(&edge.from), id_to_idx.get(&edge.to))
			else {
				warn!("network-graph: skipping edge {key} with unknown endpoint");
				continue;
			};
			graph.add_edge(from, to, EdgeData::default());
			edges.push(EdgeInfo {
				from,
				to,
				label: edge.label.clone(),
				width: number(&edge.extra, "width").unwrap_or(options.edges.width),
				dashes: edge.extra.get("dashes").and_then(Value::as_bool).unwrap_or(false),
			});
		}

		let mut state = Self {
			graph,
			edges,
			options: options.clone(),
			transform: ViewTransform::fit(None, width, height),
			drag: DragState::default(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			width,
			height,
			animation_running: options.physics.enabled && !hierarchical,
			stabilizing: None,
		};

		if state.animation_running && options.physics.stabilization.enabled {
			state.stabilizing = Some(0);
		}
		if options.physics.stabilization.fit {
			state.fit();
		}
		state
	}

	/// Runs stabilization to completion.
	pub fn stabilize(&mut self) -> Stabilization {
		loop {
			if let Some(result) = self.stabilize_step() {
				return result;
			}
		}
	}

	/// Runs one chunk of at most `updateInterval` relaxation steps, refitting
	/// the view afterwards. Returns the outcome once motion settles or the
	/// iteration budget runs out.
	pub fn stabilize_step(&mut self) -> Option<Stabilization> {
		let start = *self.stabilizing.get_or_insert(0);
		let stabilization = &self.options.physics.stabilization;
		let (budget, fit) = (stabilization.iterations, stabilization.fit);
		let end = start
			.saturating_add(stabilization.update_interval.max(1))
			.min(budget);

		let mut done = start;
		let mut result = None;
		for i in start + 1..=end {
			done = i;
			if self.relax() < SETTLE_THRESHOLD {
				result = Some(Stabilization {
					iterations: i,
					settled: true,
				});
				break;
			}
		}
		if result.is_none() && done >= budget {
			result = Some(Stabilization {
				iterations: budget,
				settled: false,
			});
		}
		if fit {
			self.fit();
		}

		match result {
			Some(r) => {
				self.stabilizing = None;
				info!(
					"network-graph: stabilized after {} iterations (settled: {})",
					r.iterations, r.settled
				);
			}
			None => {
				self.stabilizing = Some(done);
				debug!("network-graph: stabilization {done}/{budget}");
			}
		}
		result
	}

	/// One simulation step; returns the largest distance a node moved.
	fn relax(&mut self) -> f64 {
		let before = self.positions();
		self.step_physics(STEP);
		self.positions()
			.iter()
			.filter_map(|(idx, &(x, y))| {
				let &(bx, by) = before.get(idx)?;
				Some((x - bx).hypot(y - by))
			})
			.fold(0.0, f64::max)
	}

	/// Zooms and pans so every node is visible.
	pub fn fit(&mut self) {
		self.transform = ViewTransform::fit(self.bounds(), self.width, self.height);
	}

	/// World-space bounding box of all nodes including their radius.
	pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y, r) = (node.x() as f64, node.y() as f64, node.data.user_data.size);
			let b = bounds.get_or_insert((x - r, y - r, x + r, y + r));
			b.0 = b.0.min(x - r);
			b.1 = b.1.min(y - r);
			b.2 = b.2.max(x + r);
			b.3 = b.3.max(y + r);
		});
		bounds
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if dx.hypot(dy) < node.data.user_data.size {
				found = Some(node.index());
			}
		});
		found
	}

	/// Edges touching the node being dragged are drawn selected.
	pub fn edge_selected(&self, edge: &EdgeInfo) -> bool {
		self.drag
			.node_idx
			.is_some_and(|idx| idx == edge.from || idx == edge.to)
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		let node = node.filter(|_| self.options.interaction.hover);
		self.highlight.set_hover(node, &self.edges);
	}

	/// Zooms by `factor` around a screen point.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(ViewTransform::MIN_ZOOM, ViewTransform::MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f32) {
		if self.stabilizing.is_some() {
			self.stabilize_step();
		} else if self.animation_running {
			self.step_physics(dt);
		}
		self.highlight.tick(dt as f64);
	}

	fn step_physics(&mut self, dt: f32) {
		self.graph.update(dt);
		self.apply_central_gravity(dt as f64);
		self.apply_overlap_avoidance();
	}

	fn apply_central_gravity(&mut self, dt: f64) {
		let pull = (self.options.physics.barnes_hut.central_gravity * dt).clamp(0.0, 1.0) as f32;
		if pull <= 0.0 {
			return;
		}
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				node.data.x -= node.data.x * pull;
				node.data.y -= node.data.y * pull;
			}
		});
	}

	fn apply_overlap_avoidance(&mut self) {
		let avoid = self.options.physics.barnes_hut.avoid_overlap.clamp(0.0, 1.0);
		if avoid <= 0.0 {
			return;
		}
		let mut nodes = Vec::new();
		self.graph.visit_nodes(|node| {
			nodes.push((
				node.index(),
				node.x() as f64,
				node.y() as f64,
				node.data.user_data.size,
				node.data.is_anchor,
			));
		});

		let mut push: HashMap<DefaultNodeIdx, (f64, f64)> = HashMap::new();
		for (i, a) in nodes.iter().enumerate() {
			for b in &nodes[i + 1..] {
				let (dx, dy) = (b.1 - a.1, b.2 - a.2);
				let dist = dx.hypot(dy);
				let min_dist = avoid * (a.3 + b.3);
				if dist >= min_dist || dist < 1e-6 {
					continue;
				}
				let overlap = (min_dist - dist) / 2.0;
				let (ux, uy) = (dx / dist, dy / dist);
				if !a.4 {
					let p = push.entry(a.0).or_default();
					p.0 -= ux * overlap;
					p.1 -= uy * overlap;
				}
				if !b.4 {
					let p = push.entry(b.0).or_default();
					p.0 += ux * overlap;
					p.1 += uy * overlap;
				}
			}
		}
		if push.is_empty() {
			return;
		}
		self.graph.visit_nodes_mut(|node| {
			if let Some(&(px, py)) = push.get(&node.index()) {
				node.data.x += px as f32;
				node.data.y += py as f32;
			}
		});
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network::build_network;
	use crate::components::network::options::SortMethod;
	use serde_json::json;

	fn data(value: serde_json::Value) -> NetworkData {
		build_network(serde_json::from_value(value).unwrap()).unwrap()
	}

	fn chain() -> NetworkData {
		data(json!({
			"nodes": [
				{"id": 1, "label": "gateway", "group": "router"},
				{"id": 2, "group": "switch", "image": "/static/img/sw.png"},
				{"id": 3, "group": "router", "color": "#ff0000", "size": 8}
			],
			"edges": [{"from": 1, "to": 2, "label": "fiber"}, {"from": 2, "to": 3, "width": 5}]
		}))
	}

	fn node_infos(state: &NetworkState) -> Vec<NodeInfo> {
		let mut infos = Vec::new();
		state.graph.visit_nodes(|n| infos.push(n.data.user_data.clone()));
		infos
	}

	#[test]
	fn test_fit_centers_bounds() {
		let t = ViewTransform::fit(Some((-100.0, -50.0, 100.0, 50.0)), 800.0, 600.0);
		assert!((t.k - 3.6).abs() < 1e-9);
		assert_eq!((t.x, t.y), (400.0, 300.0));
	}

	#[test]
	fn test_fit_without_nodes_centers_origin() {
		let t = ViewTransform::fit(None, 800.0, 600.0);
		assert_eq!(t, ViewTransform { x: 400.0, y: 300.0, k: 1.0 });
	}

	#[test]
	fn test_fit_clamps_zoom() {
		let t = ViewTransform::fit(Some((0.0, 0.0, 0.0, 0.0)), 800.0, 600.0);
		assert_eq!(t.k, ViewTransform::MAX_ZOOM);
	}

	#[test]
	fn test_node_and_edge_display_data() {
		let state = NetworkState::new(&chain(), &NetworkOptions::default(), 800.0, 600.0);
		let infos = node_infos(&state);

		assert_eq!(infos.len(), 3);
		let gateway = infos.iter().find(|n| n.id == NodeId::Int(1)).unwrap();
		let switch = infos.iter().find(|n| n.id == NodeId::Int(2)).unwrap();
		let custom = infos.iter().find(|n| n.id == NodeId::Int(3)).unwrap();

		assert_eq!(gateway.size, 20.0);
		assert_eq!(gateway.shape, NodeShape::Dot);
		assert_eq!(switch.shape, NodeShape::Image);
		assert_ne!(gateway.color, switch.color);
		assert_eq!(custom.color.background, Color::rgb(255, 0, 0));
		assert_eq!(custom.size, 8.0);

		assert_eq!(state.edges.len(), 2);
		assert_eq!(state.edges[0].label.as_deref(), Some("fiber"));
		assert_eq!(state.edges[0].width, 2.0);
		assert_eq!(state.edges[1].width, 5.0);
	}

	#[test]
	fn test_stabilization_respects_budget() {
		let mut options = NetworkOptions::default();
		options.physics.stabilization.iterations = 5;
		options.physics.stabilization.enabled = false;
		let mut state = NetworkState::new(&chain(), &options, 800.0, 600.0);

		let result = state.stabilize();
		assert!(result.iterations <= 5);
		assert!(result.iterations >= 1);
	}

	#[test]
	fn test_stabilization_runs_in_frame_chunks() {
		let mut options = NetworkOptions::default();
		options.physics.stabilization.iterations = 30;
		options.physics.stabilization.update_interval = 10;
		let mut state = NetworkState::new(&chain(), &options, 800.0, 600.0);
		assert_eq!(state.stabilizing, Some(0));

		state.tick(STEP);
		assert!(state.stabilizing.is_none_or(|done| done == 10));

		state.tick(STEP);
		state.tick(STEP);
		assert_eq!(state.stabilizing, None);
	}

	#[test]
	fn test_stabilization_disabled_starts_animating() {
		let mut options = NetworkOptions::default();
		options.physics.stabilization.enabled = false;
		let state = NetworkState::new(&chain(), &options, 800.0, 600.0);

		assert!(state.animation_running);
		assert_eq!(state.stabilizing, None);
	}

	#[test]
	fn test_dragged_node_selects_its_edges() {
		let mut state = NetworkState::new(&chain(), &NetworkOptions::default(), 800.0, 600.0);
		let first = state.edges[0].from;
		assert!(!state.edge_selected(&state.edges[0]));

		state.drag.node_idx = Some(first);
		assert!(state.edge_selected(&state.edges[0]));
		assert!(!state.edge_selected(&state.edges[1]));
	}

	#[test]
	fn test_hierarchical_nodes_are_anchored() {
		let mut options = NetworkOptions::default();
		options.layout.hierarchical.enabled = true;
		options.layout.hierarchical.sort_method = SortMethod::Directed;
		let state = NetworkState::new(&chain(), &options, 800.0, 600.0);

		assert!(!state.animation_running);
		let mut ys = Vec::new();
		state.graph.visit_nodes(|n| {
			assert!(n.data.is_anchor);
			ys.push(n.y());
		});
		ys.sort_by(f32::total_cmp);
		ys.dedup();
		assert_eq!(ys.len(), 3);
	}

	#[test]
	fn test_hover_marks_neighbors() {
		let mut state = NetworkState::new(&chain(), &NetworkOptions::default(), 800.0, 600.0);
		let (first, second, third) = (state.edges[0].from, state.edges[0].to, state.edges[1].to);

		state.set_hover(Some(first));
		assert!(state.highlight.is_target(first));
		assert!(state.highlight.is_target(second));
		assert!(!state.highlight.is_target(third));

		state.highlight.tick(0.1);
		assert!(state.highlight.edge_intensity(&state.edges[0]) > 0.0);
		assert_eq!(state.highlight.edge_intensity(&state.edges[1]), 0.0);
	}

	#[test]
	fn test_hover_disabled() {
		let mut options = NetworkOptions::default();
		options.interaction.hover = false;
		let mut state = NetworkState::new(&chain(), &options, 800.0, 600.0);
		let first = state.edges[0].from;

		state.set_hover(Some(first));
		assert_eq!(state.highlight.hovered_node, None);
	}

	#[test]
	fn test_node_hit_testing() {
		let mut options = NetworkOptions::default();
		options.physics.enabled = false;
		options.physics.stabilization.fit = false;
		let state = NetworkState::new(&chain(), &options, 800.0, 600.0);

		// first ring position is (spring_length, 0) in world space
		let (sx, sy) = (400.0 + 95.0, 300.0);
		let hit = state.node_at_position(sx, sy).unwrap();
		let mut hit_id = None;
		state.graph.visit_nodes(|n| {
			if n.index() == hit {
				hit_id = Some(n.data.user_data.id.clone());
			}
		});
		assert_eq!(hit_id, Some(NodeId::Int(1)));
		assert_eq!(state.node_at_position(0.0, 0.0), None);
	}

	#[test]
	fn test_zoom_keeps_point_fixed() {
		let mut state = NetworkState::new(&NetworkData::default(), &NetworkOptions::default(), 800.0, 600.0);
		let before = state.screen_to_graph(100.0, 100.0);
		state.zoom_at(100.0, 100.0, 1.1);
		let after = state.screen_to_graph(100.0, 100.0);

		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn test_empty_network() {
		let state = NetworkState::new(&NetworkData::default(), &NetworkOptions::default(), 800.0, 600.0);
		assert!(state.bounds().is_none());
		assert!(state.edges.is_empty());
	}
}
