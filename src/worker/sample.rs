//! The graph the worker lays out.

/// A vertex, identified by a string id.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	/// Unique id referenced by links.
	pub id: String,
}

/// An undirected link between two node ids.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	/// Id of one endpoint.
	pub source: String,
	/// Id of the other endpoint.
	pub target: String,
}

/// Nodes and links in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	/// All nodes; their order fixes vertex indices in the result.
	pub nodes: Vec<GraphNode>,
	/// All links.
	pub links: Vec<GraphLink>,
}

/// Random tree of `n` nodes: every node after the first links to an earlier one.
pub fn generate(n: usize) -> GraphData {
	let nodes = (0..n).map(|i| GraphNode { id: i.to_string() }).collect();

	let links = (1..n)
		.map(|i| {
			let target = (rand_simple(i) * (i as f64)) as usize;
			GraphLink {
				source: i.to_string(),
				target: target.to_string(),
			}
		})
		.collect();

	GraphData { nodes, links }
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}
