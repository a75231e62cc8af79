use std::fmt;

use js_sys::Reflect;
use wasm_bindgen::JsValue;
use web_sys::{HtmlCanvasElement, Window};

/// Why the offscreen worker path cannot be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnsupportedReason {
	/// WebGPU is present; the offscreen surface cannot be handed to it.
	GpuAvailable,
	/// `OffscreenCanvas` is not a global.
	NoOffscreenCanvas,
	/// Canvas elements lack `transferControlToOffscreen`.
	NoTransferControl,
}

impl fmt::Display for UnsupportedReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::GpuAvailable => "WebGPU is available, offscreen transfer is not used",
			Self::NoOffscreenCanvas => "OffscreenCanvas is not supported",
			Self::NoTransferControl => "canvas cannot transfer control to an offscreen surface",
		})
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStrategy {
	OffscreenWorker,
	Unsupported(UnsupportedReason),
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Capabilities {
	pub gpu: bool,
	pub offscreen_canvas: bool,
	pub transfer_control: bool,
}

impl Capabilities {
	pub fn detect(window: &Window, canvas: &HtmlCanvasElement) -> Self {
		Self {
			gpu: has(&window.navigator(), "gpu"),
			offscreen_canvas: has(window, "OffscreenCanvas"),
			transfer_control: has(canvas, "transferControlToOffscreen"),
		}
	}

	/// Predicates are checked in order; the first failure names the strategy.
	pub fn strategy(&self) -> RenderStrategy {
		if self.gpu {
			RenderStrategy::Unsupported(UnsupportedReason::GpuAvailable)
		} else if !self.offscreen_canvas {
			RenderStrategy::Unsupported(UnsupportedReason::NoOffscreenCanvas)
		} else if !self.transfer_control {
			RenderStrategy::Unsupported(UnsupportedReason::NoTransferControl)
		} else {
			RenderStrategy::OffscreenWorker
		}
	}
}

fn has(target: &JsValue, key: &str) -> bool {
	Reflect::has(target, &JsValue::from_str(key)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn caps(gpu: bool, offscreen_canvas: bool, transfer_control: bool) -> Capabilities {
		Capabilities {
			gpu,
			offscreen_canvas,
			transfer_control,
		}
	}

	#[test]
	fn all_predicates_select_worker() {
		assert_eq!(
			caps(false, true, true).strategy(),
			RenderStrategy::OffscreenWorker
		);
	}

	#[test]
	fn gpu_is_checked_first() {
		assert_eq!(
			caps(true, false, false).strategy(),
			RenderStrategy::Unsupported(UnsupportedReason::GpuAvailable)
		);
	}

	#[test]
	fn missing_offscreen_beats_missing_transfer() {
		assert_eq!(
			caps(false, false, false).strategy(),
			RenderStrategy::Unsupported(UnsupportedReason::NoOffscreenCanvas)
		);
		assert_eq!(
			caps(false, true, false).strategy(),
			RenderStrategy::Unsupported(UnsupportedReason::NoTransferControl)
		);
	}
}
