//! Kahn's algorithm with a deterministic ready set.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::prelude::*;
use petgraph::visit::NodeIndexable;

use super::{CycleError, DependencyGraph};
use crate::package::PackageId;
use crate::TieBreak;

/// Computes the load order of an acyclic graph.
///
/// The ready package picked next is the one with the lowest tier (pins), then the lowest tie-break rank.
/// With [`TieBreak::ReferenceOrder`] this keeps the result as close as possible to the reference order
/// and sorting an already sorted list returns it unchanged.
///
/// The control nodes are not part of the result.
///
/// # Errors
/// [`CycleError::Stalled`] if packages remain that can never become ready.
/// A partial order is never returned.
pub fn sort(graph: &DependencyGraph, tie_break: TieBreak) -> Result<Vec<PackageId>, CycleError> {
	let g = &graph.graph;
	let rank = tie_break_ranks(graph, tie_break);

	let mut in_degree = vec![0usize; g.node_bound()];
	let mut ready = BinaryHeap::<Reverse<(u8, usize, NodeIndex)>>::new();
	for n in g.node_indices() {
		in_degree[n.index()] = g.neighbors_directed(n, Incoming).count();
		if in_degree[n.index()] == 0 {
			ready.push(Reverse((g[n].tier(), rank[n.index()], n)));
		}
	}

	let mut order = Vec::<PackageId>::with_capacity(graph.package_count());
	let mut placed = 0usize;

	while let Some(Reverse((_, _, n))) = ready.pop() {
		placed += 1;
		if let Some(identifier) = graph.identifier(n) {
			order.push(identifier.clone());
		}

		for next in g.neighbors_directed(n, Outgoing) {
			in_degree[next.index()] -= 1;
			if in_degree[next.index()] == 0 {
				ready.push(Reverse((g[next].tier(), rank[next.index()], next)));
			}
		}
	}

	if placed < g.node_count() {
		let stuck: Vec<PackageId> = graph.package_nodes()
			.iter()
			.filter(|n| in_degree[n.index()] > 0)
			.filter_map(|n| graph.identifier(*n).cloned())
			.collect();
		log::error!("Sort stalled with {} packages unplaced, graph contains an undetected cycle", stuck.len());
		return Err(CycleError::Stalled(stuck));
	}

	Ok(order)
}

/// Rank of every node for breaking ties, indexed by node index.
fn tie_break_ranks(graph: &DependencyGraph, tie_break: TieBreak) -> Vec<usize> {
	let mut rank = vec![0usize; graph.graph.node_bound()];
	match tie_break {
		TieBreak::ReferenceOrder => {
			for n in graph.package_nodes() {
				rank[n.index()] = graph.graph[*n].position();
			}
		},
		TieBreak::Alphabetical => {
			let mut nodes = graph.package_nodes().to_vec();
			nodes.sort_by(|a, b| {
				let (a, b) = (&graph.graph[*a], &graph.graph[*b]);
				a.identifier().cmp(&b.identifier()).then(a.position().cmp(&b.position()))
			});
			for (i, n) in nodes.into_iter().enumerate() {
				rank[n.index()] = i;
			}
		},
	}
	rank
}
