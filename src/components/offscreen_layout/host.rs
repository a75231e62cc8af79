use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{ErrorEvent, HtmlCanvasElement, MessageEvent, OffscreenCanvas, Worker};

use super::capability::{Capabilities, RenderStrategy};
use super::render;
use super::state::LayoutState;
use crate::config::WORKER_URL;
use crate::error::HostError;
use crate::protocol::{self, LayoutResult, WorkerMessage};

/// A running layout worker and the handlers listening to it.
///
/// Dropping the session terminates the worker.
pub struct HostSession {
	worker: Worker,
	_on_message: Closure<dyn FnMut(MessageEvent)>,
	_on_error: Closure<dyn FnMut(ErrorEvent)>,
}

impl Drop for HostSession {
	fn drop(&mut self) {
		self.worker.terminate();
	}
}

/// Probe the browser and, if the offscreen path is available, hand a fresh
/// surface to the layout worker.
///
/// Returns `Ok(None)` when the probe picks no supported strategy; `state`
/// records why.
pub fn initialize(state: RwSignal<LayoutState>) -> Result<Option<HostSession>, HostError> {
	let window = web_sys::window().ok_or(HostError::NoWindow)?;
	let document = window.document().ok_or(HostError::NoDocument)?;
	let canvas: HtmlCanvasElement = document
		.create_element("canvas")
		.map_err(HostError::js("create canvas"))?
		.unchecked_into();

	let capabilities = Capabilities::detect(&window, &canvas);
	debug!("capabilities: {capabilities:?}");
	if let RenderStrategy::Unsupported(reason) = capabilities.strategy() {
		warn!("no supported layout strategy: {reason}");
		state.update(|s| {
			s.unsupported(reason);
		});
		return Ok(None);
	}

	let offscreen = canvas
		.transfer_control_to_offscreen()
		.map_err(HostError::js("transfer control to offscreen"))?;
	let performance = window.performance().ok_or(HostError::NoPerformance)?;
	// Elapsed time includes worker startup.
	let started_at = performance.now();
	let worker = Worker::new(WORKER_URL).map_err(HostError::js("spawn layout worker"))?;
	info!("layout worker spawned from {WORKER_URL}");

	let pending = Rc::new(RefCell::new(Some(offscreen)));

	let on_message = {
		let worker = worker.clone();
		Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
			let message = match WorkerMessage::from_js(&ev.data()) {
				Ok(message) => message,
				Err(err) => {
					error!("malformed worker message: {err}");
					fail(state, &worker, err.to_string());
					return;
				}
			};
			match message {
				WorkerMessage::Ready => {
					let Some(canvas) = pending.borrow_mut().take() else {
						debug!("worker announced ready twice");
						return;
					};
					if let Err(err) = send_request(&worker, &canvas) {
						error!("failed to send layout request: {err}");
						fail(state, &worker, err.to_string());
					}
				}
				WorkerMessage::Result(result) => {
					let elapsed = performance.now() - started_at;
					on_result(state, &worker, elapsed, &result);
				}
				WorkerMessage::Error(message) => {
					error!("layout worker reported: {message}");
					fail(state, &worker, message);
				}
			}
		})
	};
	worker.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

	let on_error = {
		let worker = worker.clone();
		Closure::<dyn FnMut(ErrorEvent)>::new(move |ev: ErrorEvent| {
			let message = ev.message();
			error!("layout worker error: {message}");
			fail(state, &worker, message);
		})
	};
	worker.set_onerror(Some(on_error.as_ref().unchecked_ref()));

	Ok(Some(HostSession {
		worker,
		_on_message: on_message,
		_on_error: on_error,
	}))
}

/// Post the surface to the worker. The handle is moved and must not be used
/// afterwards.
fn send_request(worker: &Worker, canvas: &OffscreenCanvas) -> Result<(), HostError> {
	let (request, transfer) = protocol::transfer_request(canvas);
	worker
		.post_message_with_transfer(&request, &transfer)
		.map_err(HostError::js("post layout request"))?;
	debug!("layout request sent");
	Ok(())
}

fn on_result(state: RwSignal<LayoutState>, worker: &Worker, elapsed_ms: f64, result: &LayoutResult) {
	let accepted = state.try_update(|s| s.complete(elapsed_ms)).unwrap_or(false);
	if !accepted {
		debug!("ignoring unsolicited layout result");
		return;
	}
	worker.terminate();
	info!(
		"layout of {} vertices received after {:.1} ms",
		result.vertex_num, elapsed_ms
	);
	if let Err(err) = render::render_result(result) {
		error!("failed to render layout: {err}");
	}
}

fn fail(state: RwSignal<LayoutState>, worker: &Worker, message: String) {
	if state.try_update(|s| s.fail(message)).unwrap_or(false) {
		worker.terminate();
	}
}
