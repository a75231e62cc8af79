//! Messages exchanged between the page and the layout worker.
//!
//! The page sends a single request carrying an `OffscreenCanvas` in the
//! transfer list. The worker first announces it is ready, then answers with
//! either a layout result or an error. Everything travels as plain JS
//! objects through the structured-clone transport; this module owns the
//! field names and the conversion to and from Rust types.

use js_sys::{Array, Float32Array, Object, Reflect, Uint32Array};
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::OffscreenCanvas;

/// Floats per vertex in `vertexEdgeData`: `[x, y, aux0, aux1]`.
pub const VERTEX_STRIDE: usize = 4;

const CANVAS_FIELD: &str = "canvas";
const READY_FIELD: &str = "ready";
const ERROR_FIELD: &str = "error";
const VERTEX_NUM_FIELD: &str = "vertexNum";
const EDGE_INDEX_FIELD: &str = "edgeIndexBufferData";
const VERTEX_DATA_FIELD: &str = "vertexEdgeData";

/// Malformed message payloads.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
	/// The message was not a JS object.
	#[error("message is not an object")]
	NotAnObject,
	/// A required field was absent or undefined.
	#[error("missing field `{0}`")]
	MissingField(&'static str),
	/// A field was present with the wrong shape.
	#[error("field `{field}` is not {expected}")]
	InvalidField {
		/// Field name on the wire.
		field: &'static str,
		/// Human description of the accepted shape.
		expected: &'static str,
	},
}

/// Final layout produced by the worker.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutResult {
	/// Number of vertices described by `vertex_edge_data`.
	pub vertex_num: u32,
	/// Endpoint pairs, two vertex indices per edge.
	pub edge_index_buffer_data: Vec<u32>,
	/// `VERTEX_STRIDE` floats per vertex; x and y in [-1, 1].
	pub vertex_edge_data: Vec<f32>,
}

/// Anything the worker posts back to the page.
#[derive(Clone, Debug, PartialEq)]
pub enum WorkerMessage {
	/// The worker has installed its request handler.
	Ready,
	/// The layout finished.
	Result(LayoutResult),
	/// The worker could not serve the request.
	Error(String),
}

impl WorkerMessage {
	/// Build the JS value to post, plus the objects to move rather than clone.
	pub fn to_js(&self) -> (JsValue, Array) {
		let obj = Object::new();
		let transfer = Array::new();
		match self {
			Self::Ready => set(&obj, READY_FIELD, &JsValue::TRUE),
			Self::Error(message) => set(&obj, ERROR_FIELD, &JsValue::from_str(message)),
			Self::Result(result) => {
				let edges: Array = result
					.edge_index_buffer_data
					.iter()
					.map(|&i| JsValue::from(i))
					.collect();
				let vertices = Float32Array::from(result.vertex_edge_data.as_slice());
				set(&obj, VERTEX_NUM_FIELD, &JsValue::from(result.vertex_num));
				set(&obj, EDGE_INDEX_FIELD, &edges);
				set(&obj, VERTEX_DATA_FIELD, &vertices);
				transfer.push(&vertices.buffer());
			}
		}
		(obj.into(), transfer)
	}

	/// Decode a message received from the worker.
	pub fn from_js(value: &JsValue) -> Result<Self, ProtocolError> {
		if !value.is_object() {
			return Err(ProtocolError::NotAnObject);
		}
		if let Some(message) = field(value, ERROR_FIELD) {
			return message
				.as_string()
				.map(Self::Error)
				.ok_or(ProtocolError::InvalidField {
					field: ERROR_FIELD,
					expected: "a string",
				});
		}
		if field(value, READY_FIELD).and_then(|v| v.as_bool()) == Some(true) {
			return Ok(Self::Ready);
		}
		LayoutResult::from_js(value).map(Self::Result)
	}
}

impl LayoutResult {
	fn from_js(value: &JsValue) -> Result<Self, ProtocolError> {
		let vertex_num = required(value, VERTEX_NUM_FIELD)?
			.as_f64()
			.and_then(as_index)
			.ok_or(ProtocolError::InvalidField {
				field: VERTEX_NUM_FIELD,
				expected: "a non-negative integer",
			})?;

		let edges = required(value, EDGE_INDEX_FIELD)?;
		let edge_index_buffer_data = if let Some(typed) = edges.dyn_ref::<Uint32Array>() {
			typed.to_vec()
		} else if let Some(array) = edges.dyn_ref::<Array>() {
			array
				.iter()
				.map(|v| v.as_f64().and_then(as_index))
				.collect::<Option<Vec<_>>>()
				.ok_or(ProtocolError::InvalidField {
					field: EDGE_INDEX_FIELD,
					expected: "an array of vertex indices",
				})?
		} else {
			return Err(ProtocolError::InvalidField {
				field: EDGE_INDEX_FIELD,
				expected: "an array of vertex indices",
			});
		};

		let vertex_edge_data = required(value, VERTEX_DATA_FIELD)?
			.dyn_ref::<Float32Array>()
			.map(Float32Array::to_vec)
			.ok_or(ProtocolError::InvalidField {
				field: VERTEX_DATA_FIELD,
				expected: "a Float32Array",
			})?;

		Ok(Self {
			vertex_num,
			edge_index_buffer_data,
			vertex_edge_data,
		})
	}
}

/// The page-to-worker request: `{ canvas }`, with the canvas transferred.
pub fn transfer_request(canvas: &OffscreenCanvas) -> (JsValue, Array) {
	let obj = Object::new();
	set(&obj, CANVAS_FIELD, canvas);
	(obj.into(), Array::of1(canvas))
}

/// Pull the transferred surface out of a request.
pub fn canvas_from_request(value: &JsValue) -> Result<OffscreenCanvas, ProtocolError> {
	if !value.is_object() {
		return Err(ProtocolError::NotAnObject);
	}
	required(value, CANVAS_FIELD)?
		.dyn_into::<OffscreenCanvas>()
		.map_err(|_| ProtocolError::InvalidField {
			field: CANVAS_FIELD,
			expected: "an OffscreenCanvas",
		})
}

fn set(obj: &Object, key: &str, value: &JsValue) {
	let _ = Reflect::set(obj, &JsValue::from_str(key), value);
}

fn field(value: &JsValue, key: &str) -> Option<JsValue> {
	Reflect::get(value, &JsValue::from_str(key))
		.ok()
		.filter(|v| !v.is_undefined() && !v.is_null())
}

fn required(value: &JsValue, key: &'static str) -> Result<JsValue, ProtocolError> {
	field(value, key).ok_or(ProtocolError::MissingField(key))
}

fn as_index(n: f64) -> Option<u32> {
	(n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64).then_some(n as u32)
}
