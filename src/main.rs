//! Client entrypoint for the CSR build.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use leptos::prelude::*;
use log::error;
use network_graph::{CONTAINER_ID, ErrorPanel, find_container, init_logging, load_options, mount_network};

fn main() {
	init_logging();

	match find_container(CONTAINER_ID) {
		Ok(container) => mount_network(container, load_options()),
		Err(e) => {
			error!("network-graph: {e}");
			let message = e.to_string();
			mount_to_body(move || view! { <ErrorPanel message=message /> })
		}
	}
}
