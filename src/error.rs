//! Error types for the host page and the layout worker.

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::protocol::ProtocolError;

/// Failures on the main thread while setting up the worker or drawing.
#[derive(Debug, Error)]
pub enum HostError {
	/// No `window` global (not running in a browser document).
	#[error("no window available")]
	NoWindow,
	/// The window has no document.
	#[error("no document available")]
	NoDocument,
	/// `window.performance` is missing.
	#[error("performance timer unavailable")]
	NoPerformance,
	/// The render target element is not in the document.
	#[error("container element #{0} not found")]
	MissingContainer(String),
	/// A browser API call threw.
	#[error("{context}: {message}")]
	Js {
		/// What was being attempted.
		context: &'static str,
		/// Text of the thrown value.
		message: String,
	},
}

impl HostError {
	/// Adapter for `map_err` on `Result<_, JsValue>`.
	pub fn js(context: &'static str) -> impl FnOnce(JsValue) -> Self {
		move |value| Self::Js {
			context,
			message: js_message(&value),
		}
	}
}

/// Failures inside the layout worker, reported back as an error message.
#[derive(Debug, Error)]
pub enum WorkerError {
	/// The request carried no transferable surface.
	#[error("request did not carry an OffscreenCanvas")]
	MissingCanvas,
	/// The request was not a well-formed message.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
}

/// Best-effort text for a thrown JS value.
pub fn js_message(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
