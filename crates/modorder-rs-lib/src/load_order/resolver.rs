use std::collections::{HashMap, HashSet};

use super::*;
use crate::catalog::Catalog;
use crate::package::{PackageId, PackageRecord};
use crate::rules::RuleEntry;
use crate::ResolveOptions;

/// Computes the load order of an active package list.
///
/// Holds an immutable snapshot of its inputs, every call works from that snapshot
/// and nothing the caller owns is modified.
/// Create one with [`ResolverBuilder`].
#[derive(Debug, Clone)]
pub struct LoadOrderResolver<'c> {
	catalog: &'c Catalog,
	active: Vec<PackageRecord>,
	rules: HashMap<PackageId, Vec<RuleEntry>>,
	options: ResolveOptions,
}

impl<'c> LoadOrderResolver<'c> {
	pub(super) fn new(catalog: &'c Catalog, active: Vec<PackageRecord>, rules: HashMap<PackageId, Vec<RuleEntry>>, options: ResolveOptions) -> Self {
		Self { catalog, active, rules, options }
	}

	pub fn options(&self) -> &ResolveOptions {
		&self.options
	}

	/// The active list after removing repeated and, if configured, invalid packages.
	fn normalized_active(&self, diagnostics: &mut Vec<Diagnostic>) -> Vec<&PackageRecord> {
		let mut seen = HashSet::<&PackageId>::with_capacity(self.active.len());
		let mut active = Vec::with_capacity(self.active.len());

		for record in &self.active {
			let invalid = !self.catalog.contains(&record.identifier);
			if record.identifier.is_empty() || (invalid && self.options.exclude_invalid()) {
				log::info!("Excluding invalid package `{}`", record.identifier);
				diagnostics.push(Diagnostic::ExcludedInvalidPackage(record.identifier.clone()));
				continue;
			}
			if !seen.insert(&record.identifier) {
				log::warn!("Package {} is active more than once", record.identifier);
				diagnostics.push(Diagnostic::DuplicateActivePackage(record.identifier.clone()));
				continue;
			}
			active.push(record);
		}

		active
	}

	fn aggregate_all(&self, diagnostics: &mut Vec<Diagnostic>) -> Vec<CanonicalConstraintSet> {
		let active = self.normalized_active(diagnostics);
		let active_ids: HashSet<PackageId> = active.iter().map(|r| r.identifier.clone()).collect();
		let known = KnownPackages::new(self.catalog, &active_ids);

		active.into_iter().map(|record| {
			let rules = self.rules.get(&record.identifier).map(Vec::as_slice).unwrap_or_default();
			aggregate(record, rules, known, &self.options, diagnostics)
		}).collect()
	}

	/// Canonical constraints of every active package, in reference order.
	pub fn constraint_sets(&self) -> Vec<CanonicalConstraintSet> {
		self.aggregate_all(&mut Vec::new())
	}

	/// Aggregates the rules and builds the dependency graph without ordering it.
	pub fn graph(&self) -> GraphBuild {
		let mut diagnostics = Vec::new();
		let constraints = self.aggregate_all(&mut diagnostics);
		let mut build = build_graph(&constraints, &self.options);
		diagnostics.append(&mut build.diagnostics);
		build.diagnostics = diagnostics;
		build
	}

	/// Runs the full resolution.
	///
	/// Cycles are checked before sorting, a cyclic graph never reaches the sorter.
	/// The unresolved dependency and incompatibility reports are produced either way.
	pub fn resolve(&self) -> ResolveReport {
		let GraphBuild { graph, unresolved, incompatibilities, diagnostics } = self.graph();

		let cycles = detect_cycles(&graph);
		let order = if cycles.is_empty() {
			sort(&graph, self.options.tie_break())
		} else {
			log::warn!("Found {} cycle(s), no load order produced", cycles.len());
			Err(CycleError::Detected(cycles))
		};

		log::info!(
			"Resolved {} packages: {}, {} unresolved dependencies, {} incompatibilities, {} diagnostics",
			graph.package_count(),
			if order.is_ok() { "ordered" } else { "not ordered" },
			unresolved.len(),
			incompatibilities.len(),
			diagnostics.len(),
		);

		ResolveReport { order, unresolved, incompatibilities, diagnostics }
	}
}
