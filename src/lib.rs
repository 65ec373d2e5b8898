//! network-graph: browser viewer for node/edge graphs.
//!
//! Fetches a `{ nodes, edges }` document from the data endpoint, normalizes the
//! nodes, indexes both collections and renders them as an interactive
//! force-directed network on a canvas.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, error, info};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

pub mod components;
pub mod error;
pub mod loader;

pub use components::network::{
	DataSet, Edge, GraphDocument, NetworkCanvas, NetworkData, NetworkOptions, Node, NodeId,
	NodeShape, RenderNode, build_network, normalize_node,
};
pub use error::GraphError;
pub use loader::{DATA_ENDPOINT, load_graph, load_options};

/// Id of the element the network is rendered into.
pub const CONTAINER_ID: &str = "visualization";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("network-graph: logging initialized");
}

/// Looks up the element to render into.
pub fn find_container(id: &str) -> Result<HtmlElement, GraphError> {
	web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(id))
		.and_then(|e| e.dyn_into::<HtmlElement>().ok())
		.ok_or_else(|| GraphError::MissingContainer(id.to_string()))
}

/// Lifecycle of the single page-load fetch.
#[derive(Debug, Default)]
pub enum LoadState {
	#[default]
	Loading,
	Rendered(NetworkData),
	Failed(GraphError),
}

/// Visible error state.
#[component]
pub fn ErrorPanel(#[prop(into)] message: String) -> impl IntoView {
	view! {
		<div class="network-error" role="alert">
			<h2>"Could not load the graph"</h2>
			<p>{message}</p>
		</div>
	}
}

/// Main application component.
/// Fetches the graph from `source` once and renders the network, or the error
/// that stopped it.
#[component]
pub fn App(#[prop(into)] source: String, #[prop(optional)] options: NetworkOptions) -> impl IntoView {
	provide_meta_context();

	let load_state = RwSignal::new(LoadState::Loading);
	spawn_local(async move {
		match load_graph(&source).await.and_then(build_network) {
			Ok(data) => load_state.set(LoadState::Rendered(data)),
			Err(e) => {
				error!("network-graph: {e}");
				load_state.set(LoadState::Failed(e));
			}
		}
	});

	view! {
		<Title text="Network" />
		{move || {
			load_state
				.with(|state| match state {
					LoadState::Loading => {
						view! { <p class="network-status">"Loading graph..."</p> }.into_any()
					}
					LoadState::Rendered(data) => {
						view! { <NetworkCanvas data=data.clone() options=options.clone() /> }
							.into_any()
					}
					LoadState::Failed(e) => view! { <ErrorPanel message=e.to_string() /> }.into_any(),
				})
		}}
	}
}

/// Mounts the viewer into `container`. The data source is the container's
/// `data-source` attribute, or [`DATA_ENDPOINT`].
pub fn mount_network(container: HtmlElement, options: NetworkOptions) {
	let source = container
		.get_attribute("data-source")
		.unwrap_or_else(|| DATA_ENDPOINT.to_string());
	info!("network-graph: mounting, data source {source}");
	leptos::mount::mount_to(container, move || view! { <App source=source options=options /> }).forget();
}
