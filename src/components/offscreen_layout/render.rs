use std::f64::consts::PI;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::{CANVAS_HEIGHT, CANVAS_WIDTH, CONTAINER_ID, RenderStyle};
use crate::error::HostError;
use crate::protocol::{LayoutResult, VERTEX_STRIDE};

/// Map a normalized device coordinate in [-1, 1] onto [0, size]. Not clamped.
pub fn convert_webgl_coord_to_canvas(c: f64, size: f64) -> f64 {
	((c + 1.0) / 2.0) * size
}

/// Sink for the two primitives the graph is drawn with.
pub trait DrawSurface {
	fn size(&self) -> (f64, f64);
	fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), style: &RenderStyle);
	fn draw_circle(&mut self, center: (f64, f64), style: &RenderStyle);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
	pub edges: usize,
	pub nodes: usize,
	pub skipped_edges: usize,
	pub skipped_nodes: usize,
}

/// Draw every edge, then every node, so markers sit above the lines.
///
/// Pairs that reference a vertex `>= vertex_num` or outside `vertex_data`,
/// and a dangling odd index, are skipped and counted rather than drawn.
pub fn render(
	surface: &mut impl DrawSurface,
	vertex_num: u32,
	edge_indices: &[u32],
	vertex_data: &[f32],
	style: &RenderStyle,
) -> RenderStats {
	let (width, height) = surface.size();
	let to_canvas = |(x, y): (f32, f32)| {
		(
			convert_webgl_coord_to_canvas(x as f64, width),
			convert_webgl_coord_to_canvas(y as f64, height),
		)
	};
	let mut stats = RenderStats::default();

	for pair in edge_indices.chunks(2) {
		let endpoints = match *pair {
			[a, b] => position(vertex_data, vertex_num, a).zip(position(vertex_data, vertex_num, b)),
			_ => None,
		};
		match endpoints {
			Some((from, to)) => {
				surface.draw_line(to_canvas(from), to_canvas(to), style);
				stats.edges += 1;
			}
			None => stats.skipped_edges += 1,
		}
	}

	for vertex in vertex_data
		.chunks_exact(VERTEX_STRIDE)
		.take(vertex_num as usize)
	{
		surface.draw_circle(to_canvas((vertex[0], vertex[1])), style);
		stats.nodes += 1;
	}
	stats.skipped_nodes = (vertex_num as usize).saturating_sub(stats.nodes);

	if stats.skipped_edges > 0 || stats.skipped_nodes > 0 {
		warn!(
			"skipped {} edges and {} nodes with out-of-range indices",
			stats.skipped_edges, stats.skipped_nodes
		);
	}
	stats
}

fn position(data: &[f32], vertex_num: u32, idx: u32) -> Option<(f32, f32)> {
	if idx >= vertex_num {
		return None;
	}
	let base = (idx as usize).checked_mul(VERTEX_STRIDE)?;
	match data.get(base..base.checked_add(VERTEX_STRIDE)?)? {
		[x, y, ..] => Some((*x, *y)),
		_ => None,
	}
}

/// A fresh 2D canvas mounted into the page container.
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
}

impl CanvasSurface {
	/// Replaces whatever the container held, so repeated renders do not stack.
	pub fn mount(container_id: &str, width: f64, height: f64) -> Result<Self, HostError> {
		let document = web_sys::window()
			.ok_or(HostError::NoWindow)?
			.document()
			.ok_or(HostError::NoDocument)?;
		let container = document
			.get_element_by_id(container_id)
			.ok_or_else(|| HostError::MissingContainer(container_id.to_owned()))?;
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")
			.map_err(HostError::js("create canvas"))?
			.dyn_into()
			.map_err(|_| HostError::Js {
				context: "create canvas",
				message: "element is not a canvas".into(),
			})?;
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		container.replace_children_with_node_1(&canvas);

		let ctx = canvas
			.get_context("2d")
			.map_err(HostError::js("get 2d context"))?
			.ok_or_else(|| HostError::Js {
				context: "get 2d context",
				message: "context unavailable".into(),
			})?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| HostError::Js {
				context: "get 2d context",
				message: "unexpected context type".into(),
			})?;

		Ok(Self { ctx, width, height })
	}
}

impl DrawSurface for CanvasSurface {
	fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	fn draw_line(&mut self, (x1, y1): (f64, f64), (x2, y2): (f64, f64), style: &RenderStyle) {
		let ctx = &self.ctx;
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.set_stroke_style_str(style.edge_stroke);
		ctx.set_line_width(style.edge_width);
		ctx.stroke();
	}

	fn draw_circle(&mut self, (x, y): (f64, f64), style: &RenderStyle) {
		let ctx = &self.ctx;
		ctx.begin_path();
		let _ = ctx.arc(x, y, style.node_radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(style.node_fill);
		ctx.fill();
		ctx.set_stroke_style_str(style.node_stroke);
		ctx.set_line_width(style.node_stroke_width);
		ctx.stroke();
	}
}

/// Draw a worker result into the page's `#container`.
pub fn render_result(result: &LayoutResult) -> Result<RenderStats, HostError> {
	let mut surface = CanvasSurface::mount(CONTAINER_ID, CANVAS_WIDTH, CANVAS_HEIGHT)?;
	let stats = render(
		&mut surface,
		result.vertex_num,
		&result.edge_index_buffer_data,
		&result.vertex_edge_data,
		&RenderStyle::default(),
	);
	debug!("drew {} edges and {} nodes", stats.edges, stats.nodes);
	Ok(stats)
}
