//! Leptos component wrapping the network canvas.
//!
//! The component creates a canvas, builds the simulation state from the data
//! sets once it is mounted, and wires up pointer handlers for node dragging,
//! panning, zooming and hover. An animation loop runs via
//! `requestAnimationFrame`, stepping the simulation and redrawing each frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::graph::NetworkData;
use super::options::NetworkOptions;
use super::render::{self, ImageCache};
use super::state::{NetworkState, STEP};
use super::theme::Theme;

/// Everything the animation loop and event handlers share.
struct NetworkContext {
	state: NetworkState,
	theme: Theme,
	images: ImageCache,
}

type Shared<T> = Rc<RefCell<Option<T>>>;

fn viewport(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

/// Canvas size: the parent's box when it has one, else the viewport.
fn canvas_size(parent: Option<(f64, f64)>, viewport: (f64, f64)) -> (f64, f64) {
	parent
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(viewport)
}

fn measure(canvas: &HtmlCanvasElement, window: &Window) -> (f64, f64) {
	let parent = canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64));
	canvas_size(parent, viewport(window))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the node and edge data sets as an interactive force-directed network.
///
/// The canvas fills its parent element (or the viewport when the parent has
/// no size) and is re-measured on every window resize.
#[component]
pub fn NetworkCanvas(data: NetworkData, #[prop(optional)] options: NetworkOptions) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Shared<NetworkContext> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let resize_cb: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("network-graph: no window to render into");
			return;
		};

		let (w, h) = measure(&canvas, &window);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					error!("network-graph: 2d context has an unexpected type");
					return;
				}
			},
			_ => {
				error!("network-graph: canvas 2d context unavailable");
				return;
			}
		};

		let state = NetworkState::new(&data, &options, w, h);
		info!(
			"network-graph: rendering {} nodes, {} edges at {}x{}",
			data.nodes.len(),
			data.edges.len(),
			w,
			h
		);
		let images = ImageCache::load(&state);
		*context_init.borrow_mut() = Some(NetworkContext {
			state,
			theme: Theme::default(),
			images,
		});

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = measure(&canvas_resize, &win);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(STEP);
				render::render(&c.state, &ctx, &c.theme, &c.images);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			let interaction = &c.state.options.interaction;
			let (drag_nodes, drag_view) = (interaction.drag_nodes, interaction.drag_view);
			match c.state.node_at_position(x, y) {
				Some(idx) if drag_nodes => {
					c.state.drag.active = true;
					c.state.drag.node_idx = Some(idx);
					c.state.drag.start_x = x;
					c.state.drag.start_y = y;
					let mut start = (0.0, 0.0);
					c.state.graph.visit_nodes(|node| {
						if node.index() == idx {
							start = (node.x(), node.y());
						}
					});
					(c.state.drag.node_start_x, c.state.drag.node_start_y) = start;
				}
				Some(_) => {}
				None if drag_view => {
					c.state.pan.active = true;
					c.state.pan.start_x = x;
					c.state.pan.start_y = y;
					c.state.pan.transform_start_x = c.state.transform.x;
					c.state.pan.transform_start_y = c.state.transform.y;
				}
				None => {}
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if !c.state.drag.active {
				let hovered = c.state.node_at_position(x, y);
				c.state.set_hover(hovered);
			}

			if c.state.drag.active {
				if let Some(idx) = c.state.drag.node_idx {
					let (dx, dy) = (
						(x - c.state.drag.start_x) / c.state.transform.k,
						(y - c.state.drag.start_y) / c.state.transform.k,
					);
					let (nx, ny) = (
						c.state.drag.node_start_x + dx as f32,
						c.state.drag.node_start_y + dy as f32,
					);
					c.state.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if c.state.pan.active {
				c.state.transform.x = c.state.pan.transform_start_x + (x - c.state.pan.start_x);
				c.state.transform.y = c.state.pan.transform_start_y + (y - c.state.pan.start_y);
			}
		}
	};

	let release = {
		let context = context.clone();
		move |clear_hover: bool| {
			if let Some(ref mut c) = *context.borrow_mut() {
				// Dropped nodes stay anchored where they were released, except
				// in a running simulation where they rejoin the layout.
				if let Some(idx) = c.state.drag.node_idx.take() {
					let keep = !c.state.animation_running;
					c.state.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.is_anchor = keep;
						}
					});
				}
				c.state.drag.active = false;
				c.state.pan.active = false;
				if clear_hover {
					c.state.set_hover(None);
				}
			}
		}
	};
	let release_up = release.clone();
	let on_mouseup = move |_: MouseEvent| release_up(false);
	let on_mouseleave = move |_: MouseEvent| release(true);

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			if !c.state.options.interaction.zoom_view {
				return;
			}
			ev.prevent_default();
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.state.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
