//! Compile-time settings shared by the page and the layout worker.

/// Width of the rendered graph surface, in logical pixels.
pub const CANVAS_WIDTH: f64 = 600.0;
/// Height of the rendered graph surface, in logical pixels.
pub const CANVAS_HEIGHT: f64 = 600.0;

/// Id of the element the renderer mounts its canvas into.
pub const CONTAINER_ID: &str = "container";

/// Loader script Trunk emits for the `layout_worker` binary.
pub const WORKER_URL: &str = "./layout_worker_loader.js";

/// Fixed drawing attributes for edges and nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStyle {
	/// Edge stroke colour.
	pub edge_stroke: &'static str,
	/// Edge stroke width.
	pub edge_width: f64,
	/// Node circle radius.
	pub node_radius: f64,
	/// Node fill colour.
	pub node_fill: &'static str,
	/// Node outline colour.
	pub node_stroke: &'static str,
	/// Node outline width.
	pub node_stroke_width: f64,
}

impl Default for RenderStyle {
	fn default() -> Self {
		Self {
			edge_stroke: "#1890FF",
			edge_width: 1.0,
			node_radius: 5.0,
			node_fill: "red",
			node_stroke: "blue",
			node_stroke_width: 2.0,
		}
	}
}

/// Knobs for the worker-side layout run.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Number of nodes in the embedded sample graph.
	pub node_count: usize,
	/// Hard cap on solver steps.
	pub max_iterations: usize,
	/// Steps always taken before convergence is checked.
	pub warmup_iterations: usize,
	/// Simulated seconds per solver step.
	pub dt: f32,
	/// Mean per-node displacement (solver units) below which the layout is
	/// considered settled.
	pub tolerance: f32,
	/// Half-width of the normalized box the result is scaled into.
	pub extent: f32,
	/// Radius of the circle nodes start on.
	pub initial_radius: f32,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			node_count: 300,
			max_iterations: 1000,
			warmup_iterations: 20,
			dt: 0.016,
			tolerance: 0.05,
			extent: 0.9,
			initial_radius: 100.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const INDEX_HTML: &str = include_str!("../index.html");

	#[test]
	fn worker_link_emits_the_loader_script() {
		let link = INDEX_HTML
			.lines()
			.find(|line| line.contains(r#"data-type="worker""#))
			.expect("index.html declares a worker binary");
		assert!(link.contains("data-loader-shim"), "{link}");

		let bin = link
			.split(r#"data-bin=""#)
			.nth(1)
			.and_then(|rest| rest.split('"').next())
			.expect("worker link names its binary");
		assert_eq!(WORKER_URL, format!("./{bin}_loader.js"));
	}
}
