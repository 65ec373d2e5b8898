//! Canvas rendering for the network.
//!
//! Draw order: background (screen space), then edges, edge labels and nodes in
//! world space. Hovered nodes are drawn last so they sit on top.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use log::warn;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::options::{ColorInherit, NetworkOptions};
use super::state::{EdgeInfo, NetworkState, NodeInfo};
use super::theme::{Color, Theme};
use super::types::NodeShape;

/// Gap between a node and its label, in world units.
const LABEL_GAP: f64 = 5.0;

/// Images for `image` nodes, keyed by URL. Loading is left to the browser.
#[derive(Default)]
pub struct ImageCache {
	images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
	/// Starts loading every image referenced by the network.
	pub fn load(state: &NetworkState) -> Self {
		let mut images = HashMap::new();
		state.graph.visit_nodes(|node| {
			let Some(url) = &node.data.user_data.image else {
				return;
			};
			if images.contains_key(url) {
				return;
			}
			match HtmlImageElement::new() {
				Ok(img) => {
					img.set_src(url);
					images.insert(url.clone(), img);
				}
				Err(e) => warn!("network-graph: cannot create image for {url}: {e:?}"),
			}
		});
		Self { images }
	}

	/// The image for `url`, once it has finished loading.
	fn ready(&self, url: &str) -> Option<&HtmlImageElement> {
		self.images
			.get(url)
			.filter(|img| img.complete() && img.natural_width() > 0)
	}
}

/// Color of an edge given its endpoint colors and hover intensity. Selected
/// edges take the configured highlight color unless colors are inherited.
pub fn edge_color(options: &NetworkOptions, from: Color, to: Color, hover: f64, selected: bool) -> Color {
	let colors = &options.edges.color;
	let parse = |css: &str| Color::parse(css).unwrap_or(Color::rgb(0x84, 0x84, 0x84));
	let base = match colors.inherit {
		ColorInherit::From => from,
		ColorInherit::To => to,
		ColorInherit::Both => from.lerp(to, 0.5),
		ColorInherit::None if selected => parse(&colors.highlight),
		ColorInherit::None => parse(&colors.color).lerp(parse(&colors.hover), hover),
	};
	base.with_alpha(colors.opacity.clamp(0.0, 1.0))
}

/// Endpoint data an edge needs from its nodes.
#[derive(Clone, Copy)]
struct EdgeEnd {
	x: f64,
	y: f64,
	color: Color,
	size: f64,
}

/// Renders the complete network to the canvas.
pub fn render(state: &NetworkState, ctx: &CanvasRenderingContext2d, theme: &Theme, images: &ImageCache) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let mut ends: HashMap<DefaultNodeIdx, EdgeEnd> = HashMap::new();
	state.graph.visit_nodes(|node| {
		ends.insert(
			node.index(),
			EdgeEnd {
				x: node.x() as f64,
				y: node.y() as f64,
				color: node.data.user_data.color.border,
				size: node.data.user_data.size,
			},
		);
	});

	for edge in &state.edges {
		if let (Some(from), Some(to)) = (ends.get(&edge.from), ends.get(&edge.to)) {
			draw_edge(state, ctx, theme, edge, *from, *to);
		}
	}

	// Pass 1: resting nodes; pass 2: highlighted nodes on top
	for highlighted in [false, true] {
		state.graph.visit_nodes(|node| {
			let idx = node.index();
			if (state.highlight.node_intensity(idx) > 0.001) == highlighted {
				let (x, y) = (node.x() as f64, node.y() as f64);
				draw_node(state, ctx, theme, images, idx, x, y, &node.data.user_data);
			}
		});
	}

	ctx.restore();
}

fn set_shadow(ctx: &CanvasRenderingContext2d, theme: &Theme, enabled: bool) {
	if enabled {
		ctx.set_shadow_color(&theme.shadow.to_css());
		ctx.set_shadow_blur(theme.shadow_blur);
		ctx.set_shadow_offset_x(theme.shadow_offset);
		ctx.set_shadow_offset_y(theme.shadow_offset);
	} else {
		ctx.set_shadow_color("rgba(0, 0, 0, 0)");
		ctx.set_shadow_blur(0.0);
		ctx.set_shadow_offset_x(0.0);
		ctx.set_shadow_offset_y(0.0);
	}
}

fn draw_edge(
	state: &NetworkState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	edge: &EdgeInfo,
	from: EdgeEnd,
	to: EdgeEnd,
) {
	let options = &state.options;
	let hover = state.highlight.edge_intensity(edge);
	let color = edge_color(options, from.color, to.color, hover, state.edge_selected(edge));
	let (x1, y1, x2, y2) = (from.x, from.y, to.x, to.y);

	set_shadow(ctx, theme, options.edges.shadow);
	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(edge.width * (1.0 + 0.5 * hover));
	if edge.dashes {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(5.0),
			&JsValue::from_f64(5.0),
		));
	}

	ctx.begin_path();
	if edge.from == edge.to {
		// self loop drawn as a circle touching the node
		let r = from.size * 0.75;
		let _ = ctx.arc(x1 + from.size, y1 - from.size, r, 0.0, 2.0 * PI);
	} else {
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
	}
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	set_shadow(ctx, theme, false);

	if let Some(label) = &edge.label {
		let (mx, my) = if edge.from == edge.to {
			(x1 + from.size, y1 - from.size * 1.75)
		} else {
			((x1 + x2) / 2.0, (y1 + y2) / 2.0)
		};
		ctx.set_font(&options.nodes.font.css());
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.set_line_width(2.0);
		ctx.set_stroke_style_str(&theme.label_halo.to_css());
		let _ = ctx.stroke_text(label, mx, my);
		ctx.set_fill_style_str(&theme.edge_label_color.to_css());
		let _ = ctx.fill_text(label, mx, my);
	}
}

#[allow(clippy::too_many_arguments)]
fn draw_node(
	state: &NetworkState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	images: &ImageCache,
	idx: DefaultNodeIdx,
	x: f64,
	y: f64,
	info: &NodeInfo,
) {
	let options = &state.options.nodes;
	let t = state.highlight.node_intensity(idx);
	let radius = info.size;

	set_shadow(ctx, theme, options.shadow);

	let image = match info.shape {
		NodeShape::Image => info.image.as_deref().and_then(|url| images.ready(url)),
		NodeShape::Dot => None,
	};

	let bottom = if let Some(img) = image {
		let w = radius * 2.0;
		let h = w * img.natural_height() as f64 / img.natural_width() as f64;
		let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x - w / 2.0, y - h / 2.0, w, h);
		if t > 0.01 {
			set_shadow(ctx, theme, false);
			ctx.set_stroke_style_str(&info.color.border.with_alpha(t).to_css());
			ctx.set_line_width(options.border_width);
			ctx.stroke_rect(x - w / 2.0, y - h / 2.0, w, h);
		}
		y + h / 2.0
	} else {
		let fill = info.color.background.lerp(info.color.highlight, t);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&fill.to_css());
		ctx.fill();

		if options.border_width > 0.0 {
			set_shadow(ctx, theme, false);
			ctx.set_stroke_style_str(&info.color.border.to_css());
			ctx.set_line_width(options.border_width * (1.0 + t));
			ctx.stroke();
		}
		y + radius
	};
	set_shadow(ctx, theme, false);

	if let Some(label) = &info.label {
		ctx.set_font(&options.font.css());
		ctx.set_text_align("center");
		ctx.set_text_baseline("top");
		ctx.set_fill_style_str(&options.font.color);
		let _ = ctx.fill_text(label, x, bottom + LABEL_GAP);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const RED: Color = Color::rgb(255, 0, 0);
	const BLUE: Color = Color::rgb(0, 0, 255);

	#[test]
	fn test_edge_inherits_source_color_with_opacity() {
		let options = NetworkOptions::default();
		let color = edge_color(&options, RED, BLUE, 0.0, false);

		assert_eq!(color, RED.with_alpha(0.7));
	}

	#[test]
	fn test_edge_inherit_to_and_both() {
		let mut options = NetworkOptions::default();
		options.edges.color.inherit = ColorInherit::To;
		assert_eq!(edge_color(&options, RED, BLUE, 0.0, false), BLUE.with_alpha(0.7));

		options.edges.color.inherit = ColorInherit::Both;
		let mixed = edge_color(&options, RED, BLUE, 0.0, false);
		assert_eq!((mixed.r, mixed.b), (127, 127));
	}

	#[test]
	fn test_edge_without_inherit_uses_configured_colors() {
		let mut options = NetworkOptions::default();
		options.edges.color.inherit = ColorInherit::None;
		options.edges.color.hover = "#000000".to_string();
		options.edges.color.opacity = 1.0;

		assert_eq!(edge_color(&options, RED, BLUE, 0.0, false), Color::rgb(0x84, 0x84, 0x84));
		assert_eq!(edge_color(&options, RED, BLUE, 1.0, false), Color::rgb(0, 0, 0));
	}

	#[test]
	fn test_selected_edge_uses_highlight_color() {
		let mut options = NetworkOptions::default();
		options.edges.color.highlight = "#2b7ce9".to_string();
		options.edges.color.opacity = 1.0;

		assert_eq!(edge_color(&options, RED, BLUE, 0.0, true), RED);

		options.edges.color.inherit = ColorInherit::None;
		assert_eq!(edge_color(&options, RED, BLUE, 0.0, true), Color::rgb(0x2b, 0x7c, 0xe9));
		assert_eq!(edge_color(&options, RED, BLUE, 1.0, true), Color::rgb(0x2b, 0x7c, 0xe9));
	}
}
