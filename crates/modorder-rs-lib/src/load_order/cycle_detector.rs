//! Finds cycles in a [`DependencyGraph`] before any ordering is attempted.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::tarjan_scc;
use petgraph::prelude::*;

use super::DependencyGraph;
use crate::package::PackageId;

/// A closed chain of packages, the first identifier is repeated at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle(pub Vec<PackageId>);

impl Cycle {
	/// The chain including the repeated first package, e.g. `[A, B, A]`.
	pub fn chain(&self) -> &[PackageId] {
		&self.0
	}

	pub fn contains(&self, identifier: &PackageId) -> bool {
		self.0.contains(identifier)
	}

	/// Number of distinct packages in the cycle.
	pub fn len(&self) -> usize {
		self.0.len().saturating_sub(1)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl std::fmt::Display for Cycle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let chain = self.0.iter().map(|p| p.as_str()).collect::<Vec<_>>();
		write!(f, "{}", chain.join(" -> "))
	}
}

/// Ordering is impossible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
	/// The constraints contain one or more cycles.
	#[error("load order contains {} cycle(s): {}", .0.len(), display_cycles(.0))]
	Detected(Vec<Cycle>),
	/// The sorter ran out of packages to place. This means the graph held a cycle the detector missed.
	#[error("sorting stalled, packages left unplaced: {}", display_identifiers(.0))]
	Stalled(Vec<PackageId>),
}

impl CycleError {
	pub fn cycles(&self) -> &[Cycle] {
		match self {
			CycleError::Detected(cycles) => cycles,
			CycleError::Stalled(_) => &[],
		}
	}
}

fn display_cycles(cycles: &[Cycle]) -> String {
	cycles.iter().map(|c| format!("[{}]", c)).collect::<Vec<_>>().join(", ")
}

fn display_identifiers(identifiers: &[PackageId]) -> String {
	identifiers.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
}

/// Returns one cycle for every cyclic part of the graph, empty when the graph is acyclic.
///
/// The graph is split into strongly connected components and each component with more than one
/// package yields the shortest cycle through its earliest package in reference order.
/// Cycles are not enumerated, a component holding many cycles is reported once.
/// Cycles are returned in reference order of their first package.
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
	let mut components: Vec<(usize, HashSet<NodeIndex>)> = tarjan_scc(&graph.graph)
		.into_iter()
		.filter(|component| component.len() > 1)
		.filter_map(|component| {
			let first = component.iter()
				.filter(|n| graph.identifier(**n).is_some())
				.map(|n| graph.graph[*n].position())
				.min()?;
			Some((first, component.into_iter().collect()))
		})
		.collect();
	components.sort_by_key(|(first, _)| *first);

	let mut cycles = Vec::with_capacity(components.len());
	for (first, component) in components {
		let start = match graph.package_nodes().get(first) {
			Some(n) => *n,
			None => continue,
		};
		let nodes = shortest_cycle_through(graph, start, &component);
		let chain = nodes.iter()
			.chain(nodes.first())
			.filter_map(|n| graph.identifier(*n).cloned())
			.collect();
		let cycle = Cycle(chain);
		log::debug!("Found cycle {} in a component of {} packages", cycle, component.len());
		cycles.push(cycle);
	}

	cycles
}

/// Shortest cycle starting and ending at `start` using only nodes in `component`.
///
/// `start` must belong to `component`, which must be strongly connected.
fn shortest_cycle_through(graph: &DependencyGraph, start: NodeIndex, component: &HashSet<NodeIndex>) -> Vec<NodeIndex> {
	let mut previous = HashMap::<NodeIndex, NodeIndex>::new();
	let mut queue = VecDeque::from([start]);

	/* Breadth first so the first node found with an edge back to `start` closes the shortest cycle */
	while let Some(n) = queue.pop_front() {
		let successors = graph.ordered_successors(n);
		if successors.contains(&start) {
			let mut chain = vec![n];
			let mut current = n;
			while let Some(p) = previous.get(&current) {
				chain.push(*p);
				current = *p;
			}
			chain.reverse();
			return chain;
		}
		for next in successors {
			if next != start && component.contains(&next) && !previous.contains_key(&next) {
				previous.insert(next, n);
				queue.push_back(next);
			}
		}
	}

	vec![start]
}
