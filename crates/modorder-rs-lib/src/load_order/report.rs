//! Results of a resolution run.

use std::collections::BTreeMap;

use super::CycleError;
use crate::package::PackageId;
use crate::rules::{RuleEntry, RuleSource};

/// Non-fatal problems found while resolving.
///
/// These never stop the order from being produced, they are collected so they can be shown to the user.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Diagnostic {
	/// An identical rule was already present, the later one was skipped.
	#[error("duplicate rule skipped: {0}")]
	DuplicateRule(RuleEntry),
	#[error("malformed rule skipped ({1}): {0}")]
	MalformedRule(RuleEntry, &'static str),
	/// A rule refers to an identifier that isn't known at all. The rule has no effect.
	#[error("{origin} rule on `{subject}` refers to unknown package `{target}`")]
	UnknownPackageReference {
		origin: RuleSource,
		subject: PackageId,
		target: PackageId,
	},
	/// A pin contradicts an ordering relation, the relation was dropped.
	#[error("pin overrides requirement that `{before}` loads before `{after}`")]
	PinOverridesRelation {
		before: PackageId,
		after: PackageId,
	},
	#[error("package `{0}` is listed more than once, later entries ignored")]
	DuplicateActivePackage(PackageId),
	/// Active but missing from the catalog and excluded by [`ResolveOptions::exclude_invalid()`](crate::ResolveOptions::exclude_invalid()).
	#[error("package `{0}` is not in the catalog and was excluded")]
	ExcludedInvalidPackage(PackageId),
}

/// A hard dependency with no active provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedDependency {
	pub dependency: PackageId,
	/// Active packages requiring it, in reference order.
	pub required_by: Vec<PackageId>,
	/// `false` if neither the dependency nor any alternative exists in the catalog.
	pub in_catalog: bool,
}

/// Two active packages that declare themselves incompatible.
///
/// `first` is the package earlier in the reference order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incompatibility {
	pub first: PackageId,
	pub second: PackageId,
}

/// Everything produced by [`LoadOrderResolver::resolve()`](super::LoadOrderResolver::resolve()).
///
/// The dependency and incompatibility reports are always present, even when ordering failed.
#[derive(Debug, Clone)]
pub struct ResolveReport {
	pub order: Result<Vec<PackageId>, CycleError>,
	pub unresolved: Vec<UnresolvedDependency>,
	pub incompatibilities: Vec<Incompatibility>,
	pub diagnostics: Vec<Diagnostic>,
}

impl ResolveReport {
	pub fn is_ordered(&self) -> bool {
		self.order.is_ok()
	}

	pub fn order(&self) -> Option<&[PackageId]> {
		self.order.as_deref().ok()
	}

	/// The unresolved dependencies keyed by the package requiring them.
	pub fn missing_by_requirer(&self) -> BTreeMap<PackageId, Vec<PackageId>> {
		let mut map = BTreeMap::<PackageId, Vec<PackageId>>::new();
		for unresolved in &self.unresolved {
			for requirer in &unresolved.required_by {
				map.entry(requirer.clone()).or_default().push(unresolved.dependency.clone());
			}
		}
		map
	}
}
