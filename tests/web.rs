//! Browser tests for the worker message codec. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Float32Array, Object, Reflect};
use offscreen_layout::protocol::{self, LayoutResult, ProtocolError, WorkerMessage};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::OffscreenCanvas;

wasm_bindgen_test_configure!(run_in_browser);

fn object(fields: &[(&str, JsValue)]) -> JsValue {
	let obj = Object::new();
	for (key, value) in fields {
		Reflect::set(&obj, &JsValue::from_str(key), value).unwrap();
	}
	obj.into()
}

#[wasm_bindgen_test]
fn decodes_result_payload() {
	let edges: Array = [0u32, 1].iter().map(|&i| JsValue::from(i)).collect();
	let data = Float32Array::from(&[-1.0f32, -1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0][..]);
	let value = object(&[
		("vertexNum", JsValue::from(2)),
		("edgeIndexBufferData", edges.into()),
		("vertexEdgeData", data.into()),
	]);

	assert_eq!(
		WorkerMessage::from_js(&value),
		Ok(WorkerMessage::Result(LayoutResult {
			vertex_num: 2,
			edge_index_buffer_data: vec![0, 1],
			vertex_edge_data: vec![-1.0, -1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0],
		}))
	);
}

#[wasm_bindgen_test]
fn encoded_result_transfers_vertex_buffer() {
	let result = LayoutResult {
		vertex_num: 1,
		edge_index_buffer_data: vec![],
		vertex_edge_data: vec![0.25, -0.5, 0.0, 0.0],
	};
	let (value, transfer) = WorkerMessage::Result(result.clone()).to_js();
	assert_eq!(transfer.length(), 1);
	assert_eq!(WorkerMessage::from_js(&value), Ok(WorkerMessage::Result(result)));
}

#[wasm_bindgen_test]
fn decodes_ready_and_error() {
	let (ready, _) = WorkerMessage::Ready.to_js();
	assert_eq!(WorkerMessage::from_js(&ready), Ok(WorkerMessage::Ready));

	let error = object(&[("error", JsValue::from_str("boom"))]);
	assert_eq!(
		WorkerMessage::from_js(&error),
		Ok(WorkerMessage::Error("boom".into()))
	);
}

#[wasm_bindgen_test]
fn rejects_malformed_payloads() {
	assert_eq!(
		WorkerMessage::from_js(&JsValue::from(3)),
		Err(ProtocolError::NotAnObject)
	);

	let missing = object(&[("vertexNum", JsValue::from(2))]);
	assert_eq!(
		WorkerMessage::from_js(&missing),
		Err(ProtocolError::MissingField("edgeIndexBufferData"))
	);

	let negative = object(&[("vertexNum", JsValue::from(-1))]);
	assert!(matches!(
		WorkerMessage::from_js(&negative),
		Err(ProtocolError::InvalidField {
			field: "vertexNum",
			..
		})
	));

	let untyped = object(&[
		("vertexNum", JsValue::from(0)),
		("edgeIndexBufferData", Array::new().into()),
		("vertexEdgeData", Array::new().into()),
	]);
	assert!(matches!(
		WorkerMessage::from_js(&untyped),
		Err(ProtocolError::InvalidField {
			field: "vertexEdgeData",
			..
		})
	));
}

#[wasm_bindgen_test]
fn request_without_canvas_is_rejected() {
	let empty = object(&[]);
	assert_eq!(
		protocol::canvas_from_request(&empty).map(|_| ()),
		Err(ProtocolError::MissingField("canvas"))
	);
	let wrong = object(&[("canvas", JsValue::from_str("not a surface"))]);
	assert!(protocol::canvas_from_request(&wrong).is_err());
}

#[wasm_bindgen_test]
fn ready_is_a_flag_with_nothing_transferred() {
	let (ready, transfer) = WorkerMessage::Ready.to_js();
	assert_eq!(transfer.length(), 0);
	assert_eq!(
		Reflect::get(&ready, &JsValue::from_str("ready")).unwrap(),
		JsValue::TRUE
	);
	assert!(Reflect::get(&ready, &JsValue::from_str("vertexNum")).unwrap().is_undefined());
}

#[wasm_bindgen_test]
fn handshake_then_request_carries_the_surface() {
	let (ready, _) = WorkerMessage::Ready.to_js();
	assert_eq!(WorkerMessage::from_js(&ready), Ok(WorkerMessage::Ready));

	let canvas = OffscreenCanvas::new(600, 600).unwrap();
	let (request, transfer) = protocol::transfer_request(&canvas);
	assert_eq!(transfer.length(), 1);
	assert!(transfer.get(0).dyn_into::<OffscreenCanvas>().is_ok());

	let received = protocol::canvas_from_request(&request).unwrap();
	assert_eq!((received.width(), received.height()), (600, 600));
}
