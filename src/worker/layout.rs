//! Drives the force solver to rest and packs its output for the page.

use std::collections::HashMap;
use std::f32::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::debug;

use super::sample::GraphData;
use crate::config::LayoutConfig;
use crate::protocol::{LayoutResult, VERTEX_STRIDE};

/// A finished layout plus how the solver got there.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutOutcome {
	/// Normalized positions and edge pairs, ready to post.
	pub result: LayoutResult,
	/// Solver steps taken.
	pub iterations: usize,
	/// Whether the run stopped on tolerance rather than the iteration cap.
	pub converged: bool,
}

fn simulation_parameters() -> SimulationParameters {
	SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

/// Lay out `data` and scale the result into `[-extent, extent]`.
///
/// Vertex order follows `data.nodes`. Links naming an unknown node are dropped.
pub fn compute(data: &GraphData, config: &LayoutConfig) -> LayoutOutcome {
	let mut graph: ForceGraph<usize, ()> = ForceGraph::new(simulation_parameters());
	let mut id_to_idx = HashMap::new();
	let count = data.nodes.len();

	for (i, node) in data.nodes.iter().enumerate() {
		let angle = i as f32 * 2.0 * PI / count as f32;
		let idx = graph.add_node(NodeData {
			x: config.initial_radius * angle.cos(),
			y: config.initial_radius * angle.sin(),
			mass: 10.0,
			is_anchor: false,
			user_data: i,
		});
		id_to_idx.insert(node.id.as_str(), (idx, i as u32));
	}

	let mut edge_index_buffer_data = Vec::with_capacity(data.links.len() * 2);
	for link in &data.links {
		if let (Some(&(src, src_vertex)), Some(&(tgt, tgt_vertex))) = (
			id_to_idx.get(link.source.as_str()),
			id_to_idx.get(link.target.as_str()),
		) {
			graph.add_edge(src, tgt, EdgeData::default());
			edge_index_buffer_data.extend_from_slice(&[src_vertex, tgt_vertex]);
		}
	}

	let mut positions = snapshot(&graph, count);
	let mut previous = positions.clone();
	let mut iterations = 0;
	let mut converged = count == 0;

	while !converged && iterations < config.max_iterations {
		graph.update(config.dt);
		iterations += 1;
		std::mem::swap(&mut previous, &mut positions);
		positions = snapshot(&graph, count);

		if iterations >= config.warmup_iterations {
			converged = mean_displacement(&previous, &positions) < config.tolerance;
		}
	}
	debug!("layout of {count} nodes: {iterations} iterations, converged={converged}");

	LayoutOutcome {
		result: LayoutResult {
			vertex_num: count as u32,
			edge_index_buffer_data,
			vertex_edge_data: pack(&previous, &positions, config.extent),
		},
		iterations,
		converged,
	}
}

fn snapshot(graph: &ForceGraph<usize, ()>, count: usize) -> Vec<(f32, f32)> {
	let mut positions = vec![(0.0, 0.0); count];
	graph.visit_nodes(|node| {
		positions[node.data.user_data] = (node.x(), node.y());
	});
	positions
}

fn mean_displacement(previous: &[(f32, f32)], current: &[(f32, f32)]) -> f32 {
	if current.is_empty() {
		return 0.0;
	}
	let total: f32 = previous
		.iter()
		.zip(current)
		.map(|(&(px, py), &(x, y))| ((x - px).powi(2) + (y - py).powi(2)).sqrt())
		.sum();
	total / current.len() as f32
}

/// Centre the bounding box on the origin and scale it uniformly so its
/// longer side spans `[-extent, extent]`. The last step's displacement goes
/// in the two auxiliary slots, in the same units.
fn pack(previous: &[(f32, f32)], current: &[(f32, f32)], extent: f32) -> Vec<f32> {
	let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
	let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
	for &(x, y) in current {
		min_x = min_x.min(x);
		min_y = min_y.min(y);
		max_x = max_x.max(x);
		max_y = max_y.max(y);
	}
	let span = (max_x - min_x).max(max_y - min_y);
	let scale = if span.is_finite() && span > f32::EPSILON {
		2.0 * extent / span
	} else {
		0.0
	};
	let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

	let mut data = Vec::with_capacity(current.len() * VERTEX_STRIDE);
	for (&(px, py), &(x, y)) in previous.iter().zip(current) {
		data.extend_from_slice(&[
			((x - cx) * scale).clamp(-extent, extent),
			((y - cy) * scale).clamp(-extent, extent),
			(x - px) * scale,
			(y - py) * scale,
		]);
	}
	data
}
