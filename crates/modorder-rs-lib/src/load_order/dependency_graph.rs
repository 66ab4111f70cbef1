//! Module for only DependencyGraph functions not related to the overall resolving process.

use std::collections::HashMap;

use petgraph::prelude::*;
use petgraph::visit::{EdgeRef, IntoEdgeReferences};

use crate::package::{PackageId, PinState};

/// "Must precede" graph over the active packages.
///
/// An edge `A -> B` means `A` must appear before `B` in the final order.
/// Two virtual nodes bracket the packages: `source_node` precedes every `ForceTop` package
/// and `sink_node` follows every `ForceBottom` package.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
	pub graph: StableDiGraph<NodeData, EdgeData>,
	pub source_node: NodeIndex,
	pub sink_node: NodeIndex,
	/// Package nodes in reference order.
	packages: Vec<NodeIndex>,
	index: HashMap<PackageId, NodeIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
	/// An active package.
	Package {
		identifier: PackageId,
		/// Index in the reference order.
		position: usize,
		pin: PinState,
	},
	/// Control node placed before everything.
	Source,
	/// Control node placed after everything.
	Sink,
}

impl NodeData {
	pub fn identifier(&self) -> Option<&PackageId> {
		if let NodeData::Package { identifier, .. } = self {
			Some(identifier)
		} else {
			None
		}
	}

	/// Which band of the order the node belongs to, lower loads first.
	pub fn tier(&self) -> u8 {
		match self {
			NodeData::Source => 0,
			NodeData::Package { pin: PinState::ForceTop, .. } => 1,
			NodeData::Package { pin: PinState::None, .. } => 2,
			NodeData::Package { pin: PinState::ForceBottom, .. } => 3,
			NodeData::Sink => 4,
		}
	}

	pub fn position(&self) -> usize {
		if let NodeData::Package { position, .. } = self {
			*position
		} else {
			0
		}
	}
}

/// Why an edge exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeData {
	/// Target declared it loads after the source.
	LoadAfter,
	/// Source declared it loads before the target.
	LoadBefore,
	/// Target has a hard dependency on the source.
	Dependency,
	/// Connects a pinned package to a control node.
	Pin,
}

impl DependencyGraph {
	/// Adds a package node, positions are handed out in insertion order.
	///
	/// Adding an identifier that already has a node returns the existing node.
	pub fn add_package(&mut self, identifier: PackageId, pin: PinState) -> NodeIndex {
		if let Some(i) = self.index.get(&identifier) {
			return *i;
		}
		let position = self.packages.len();
		let i = self.graph.add_node(NodeData::Package { identifier: identifier.clone(), position, pin });
		match pin {
			PinState::None => {},
			PinState::ForceTop => { self.graph.add_edge(self.source_node, i, EdgeData::Pin); },
			PinState::ForceBottom => { self.graph.add_edge(i, self.sink_node, EdgeData::Pin); },
		}
		self.packages.push(i);
		self.index.insert(identifier, i);
		i
	}

	/// Adds an edge requiring `before` to load ahead of `after`.
	///
	/// Returns `false` when the edge already existed.
	/// # Errors
	/// - [`SelfEdge`](crate::Error::SelfEdge) if `before` and `after` are the same package.
	/// - [`UnknownNode`](crate::Error::UnknownNode) if either package has no node.
	pub fn add_order_edge(&mut self, before: &PackageId, after: &PackageId, kind: EdgeData) -> crate::Result<bool> {
		if before == after {
			return Err(crate::Error::SelfEdge(before.clone()));
		}
		let a = self.node_index(before).ok_or_else(|| crate::Error::UnknownNode(before.clone()))?;
		let b = self.node_index(after).ok_or_else(|| crate::Error::UnknownNode(after.clone()))?;
		if self.graph.find_edge(a, b).is_some() {
			return Ok(false);
		}
		self.graph.add_edge(a, b, kind);
		Ok(true)
	}

	pub fn node_index(&self, identifier: &PackageId) -> Option<NodeIndex> {
		self.index.get(identifier).copied()
	}

	pub fn identifier(&self, src: NodeIndex) -> Option<&PackageId> {
		self.graph.node_weight(src)?.identifier()
	}

	pub fn contains(&self, identifier: &PackageId) -> bool {
		self.index.contains_key(identifier)
	}

	pub fn pin(&self, identifier: &PackageId) -> Option<PinState> {
		match self.graph.node_weight(self.node_index(identifier)?)? {
			NodeData::Package { pin, .. } => Some(*pin),
			_ => None,
		}
	}

	pub fn package_count(&self) -> usize {
		self.packages.len()
	}

	/// Package nodes in reference order.
	pub fn package_nodes(&self) -> &[NodeIndex] {
		&self.packages
	}

	pub fn has_order_edge(&self, before: &PackageId, after: &PackageId) -> bool {
		match (self.node_index(before), self.node_index(after)) {
			(Some(a), Some(b)) => self.graph.find_edge(a, b).is_some(),
			_ => false,
		}
	}

	/// Every edge between two packages, control node edges are left out.
	pub fn order_edges(&self) -> Vec<(PackageId, PackageId, EdgeData)> {
		self.graph
			.edge_references()
			.filter_map(|e| {
				let before = self.identifier(e.source())?;
				let after = self.identifier(e.target())?;
				Some((before.clone(), after.clone(), *e.weight()))
			})
			.collect()
	}

	/// Outgoing neighbours sorted by tier then reference position so traversals are deterministic.
	pub(super) fn ordered_successors(&self, src: NodeIndex) -> Vec<NodeIndex> {
		let mut successors: Vec<NodeIndex> = self.graph.neighbors_directed(src, Outgoing).collect();
		successors.sort_by_key(|n| (self.graph[*n].tier(), self.graph[*n].position()));
		successors.dedup();
		successors
	}
}

impl Default for DependencyGraph {
	fn default() -> Self {
		let mut graph = StableDiGraph::<NodeData, EdgeData>::default();
		let source_node = graph.add_node(NodeData::Source);
		let sink_node = graph.add_node(NodeData::Sink);
		Self { graph, source_node, sink_node, packages: Default::default(), index: Default::default() }
	}
}
