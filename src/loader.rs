//! Fetching the graph document and reading page-provided configuration.

use gloo_net::http::Request;
use log::{info, warn};
use wasm_bindgen::JsCast;
use web_sys::HtmlScriptElement;

use crate::components::network::{GraphDocument, NetworkOptions};
use crate::error::GraphError;

/// Where the graph document is served unless the container overrides it.
pub const DATA_ENDPOINT: &str = "/data";

/// Id of the optional `<script type="application/json">` holding option overrides.
pub const OPTIONS_ELEMENT_ID: &str = "network-options";

/// Fetches and decodes the graph document. One request, no retry.
pub async fn load_graph(url: &str) -> Result<GraphDocument, GraphError> {
	let fetch_error = |reason: String| GraphError::Fetch {
		url: url.to_string(),
		reason,
	};

	let response = Request::get(url)
		.send()
		.await
		.map_err(|e| fetch_error(e.to_string()))?;
	check_status(url, response.status())?;
	let body = response
		.text()
		.await
		.map_err(|e| fetch_error(e.to_string()))?;

	let document = parse_document(&body)?;
	info!(
		"network-graph: loaded {} nodes, {} edges from {}",
		document.nodes.len(),
		document.edges.len(),
		url
	);
	Ok(document)
}

/// Accepts 2xx statuses only.
pub fn check_status(url: &str, status: u16) -> Result<(), GraphError> {
	if (200..300).contains(&status) {
		Ok(())
	} else {
		Err(GraphError::Status {
			url: url.to_string(),
			status,
		})
	}
}

pub fn parse_document(body: &str) -> Result<GraphDocument, GraphError> {
	Ok(serde_json::from_str(body)?)
}

fn script_text(id: &str) -> Option<String> {
	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Reads option overrides from the page, falling back to the defaults when the
/// block is absent or malformed.
pub fn load_options() -> NetworkOptions {
	let Some(json) = script_text(OPTIONS_ELEMENT_ID) else {
		return NetworkOptions::default();
	};
	match NetworkOptions::from_json(&json) {
		Ok(options) => {
			info!("network-graph: applied options from #{OPTIONS_ELEMENT_ID}");
			options
		}
		Err(e) => {
			warn!("network-graph: ignoring malformed #{OPTIONS_ELEMENT_ID}: {e}");
			NetworkOptions::default()
		}
	}
}
