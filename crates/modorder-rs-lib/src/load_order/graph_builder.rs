//! Turns canonical constraints into a [`DependencyGraph`].

use std::collections::{HashMap, HashSet};

use super::{CanonicalConstraintSet, DependencyGraph, Diagnostic, EdgeData, Incompatibility, UnresolvedDependency};
use crate::package::{PackageId, PinState};
use crate::ResolveOptions;

/// The graph along with everything found while building it.
#[derive(Debug, Clone, Default)]
pub struct GraphBuild {
	pub graph: DependencyGraph,
	pub unresolved: Vec<UnresolvedDependency>,
	pub incompatibilities: Vec<Incompatibility>,
	pub diagnostics: Vec<Diagnostic>,
}

impl GraphBuild {
	/// Adds `before -> after` unless the relation can't or shouldn't constrain the order.
	///
	/// - Self references and packages that aren't active are dropped silently.
	/// - Packages in the same pin group keep their reference order, so the edge is dropped silently.
	/// - Relations pointing against the pins are dropped with a diagnostic, a pin always wins.
	fn add_ordering(&mut self, before: &PackageId, after: &PackageId, kind: EdgeData) {
		if before == after {
			log::trace!("Dropping self reference on {}", before);
			return;
		}

		let (a, b) = match (self.graph.node_index(before), self.graph.node_index(after)) {
			(Some(a), Some(b)) => (a, b),
			_ => {
				log::trace!("Dropping {:?} edge {} -> {}, not both active", kind, before, after);
				return;
			}
		};

		let (pin_a, pin_b) = (self.graph.pin(before), self.graph.pin(after));
		if pin_a == pin_b && pin_a != Some(PinState::None) {
			log::trace!("Dropping {:?} edge {} -> {} inside pin group", kind, before, after);
			return;
		}

		if self.graph.graph[a].tier() > self.graph.graph[b].tier() {
			log::warn!("Pin on {} or {} overrides {:?} relation", before, after, kind);
			self.diagnostics.push(Diagnostic::PinOverridesRelation { before: before.clone(), after: after.clone() });
			return;
		}

		if let Err(e) = self.graph.add_order_edge(before, after, kind) {
			log::error!("Failed to add edge {} -> {}: {}", before, after, e);
		}
	}
}

/// Builds the graph for `constraints`, which must be in reference order.
///
/// The active set is exactly the packages in `constraints`.
pub fn build_graph(constraints: &[CanonicalConstraintSet], options: &ResolveOptions) -> GraphBuild {
	let mut build = GraphBuild::default();

	for set in constraints {
		build.graph.add_package(set.identifier.clone(), set.pin);
	}

	let mut unresolved_index = HashMap::<PackageId, usize>::new();
	let mut incompatible_pairs = HashSet::<(usize, usize)>::new();

	for set in constraints {
		let subject = &set.identifier;

		for target in &set.load_after {
			build.add_ordering(target, subject, EdgeData::LoadAfter);
		}
		for target in &set.load_before {
			build.add_ordering(subject, target, EdgeData::LoadBefore);
		}

		for dependency in &set.dependencies {
			match dependency.candidates.iter().find(|c| build.graph.contains(c)) {
				Some(provider) => {
					if provider != &dependency.requested {
						log::debug!("{} satisfies dependency {} of {}", provider, dependency.requested, subject);
					}
					if options.dependencies_imply_order() {
						build.add_ordering(provider, subject, EdgeData::Dependency);
					}
				},
				None => {
					let i = *unresolved_index.entry(dependency.requested.clone()).or_insert_with(|| {
						build.unresolved.push(UnresolvedDependency {
							dependency: dependency.requested.clone(),
							required_by: Vec::new(),
							in_catalog: false,
						});
						build.unresolved.len() - 1
					});
					let unresolved = &mut build.unresolved[i];
					unresolved.in_catalog |= !dependency.candidates.is_empty();
					if !unresolved.required_by.contains(subject) {
						unresolved.required_by.push(subject.clone());
					}
				},
			}
		}

		for other in &set.incompatible_with {
			if other == subject {
				continue;
			}
			if let (Some(a), Some(b)) = (build.graph.node_index(subject), build.graph.node_index(other)) {
				let (pa, pb) = (build.graph.graph[a].position(), build.graph.graph[b].position());
				let key = (pa.min(pb), pa.max(pb));
				if incompatible_pairs.insert(key) {
					let (first, second) = if pa < pb { (subject, other) } else { (other, subject) };
					build.incompatibilities.push(Incompatibility { first: first.clone(), second: second.clone() });
				}
			}
		}
	}

	build.incompatibilities.sort_by_key(|i| {
		(
			build.graph.node_index(&i.first).map(|n| build.graph.graph[n].position()),
			build.graph.node_index(&i.second).map(|n| build.graph.graph[n].position()),
		)
	});

	log::debug!(
		"Built graph with {} packages and {} edges, {} unresolved dependencies, {} incompatibilities",
		build.graph.package_count(),
		build.graph.graph.edge_count(),
		build.unresolved.len(),
		build.incompatibilities.len(),
	);

	build
}
