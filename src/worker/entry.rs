use std::cell::Cell;
use std::rc::Rc;

use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{DedicatedWorkerGlobalScope, MessageEvent};

use super::{layout, sample};
use crate::config::{CANVAS_HEIGHT, CANVAS_WIDTH, LayoutConfig};
use crate::error::{WorkerError, js_message};
use crate::protocol::{self, LayoutResult, WorkerMessage};

/// Install the request handler on the worker scope and tell the page we are
/// listening. Only the first request is served.
pub fn run() {
	let scope: DedicatedWorkerGlobalScope = js_sys::global().unchecked_into();
	let served = Rc::new(Cell::new(false));

	let responder = scope.clone();
	let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
		if served.replace(true) {
			warn!("layout worker ignoring repeated request");
			return;
		}
		let reply = match handle_request(&ev.data(), &LayoutConfig::default()) {
			Ok(result) => WorkerMessage::Result(result),
			Err(err) => {
				error!("layout request failed: {err}");
				WorkerMessage::Error(err.to_string())
			}
		};
		post(&responder, &reply);
	});
	scope.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
	on_message.forget();

	debug!("layout worker ready");
	post(&scope, &WorkerMessage::Ready);
}

fn handle_request(data: &JsValue, config: &LayoutConfig) -> Result<LayoutResult, WorkerError> {
	let canvas = protocol::canvas_from_request(data).map_err(|err| match err {
		protocol::ProtocolError::MissingField(_) => WorkerError::MissingCanvas,
		other => WorkerError::Protocol(other),
	})?;
	// The surface is ours until the layout is posted back.
	canvas.set_width(CANVAS_WIDTH as u32);
	canvas.set_height(CANVAS_HEIGHT as u32);

	let graph = sample::generate(config.node_count);
	let outcome = layout::compute(&graph, config);
	info!(
		"laid out {} nodes and {} links in {} iterations (converged: {})",
		graph.nodes.len(),
		graph.links.len(),
		outcome.iterations,
		outcome.converged
	);
	drop(canvas);
	Ok(outcome.result)
}

fn post(scope: &DedicatedWorkerGlobalScope, message: &WorkerMessage) {
	let (value, transfer) = message.to_js();
	if let Err(err) = scope.post_message_with_transfer(&value, &transfer) {
		error!("failed to post {message:?}: {}", js_message(&err));
	}
}
