//! Various types associated with packages.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

mod package_id;
pub use package_id::PackageId;

mod game_version;
pub use game_version::GameVersion;

use crate::rules::{Relation, RuleEntry, RuleSource};

/// Forces a package to one end of the load order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinState {
	#[default] None,
	/// Loaded before every package that isn't also `ForceTop`.
	ForceTop,
	/// Loaded after every package that isn't also `ForceBottom`.
	ForceBottom,
}

/// A hard dependency of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
	pub identifier: PackageId,
	/// Identifiers that satisfy the dependency when `identifier` is absent, earlier entries are preferred.
	#[serde(default)]
	pub alternatives: Vec<PackageId>,
}

impl Dependency {
	pub fn new(identifier: impl Into<PackageId>) -> Self {
		Self { identifier: identifier.into(), alternatives: Default::default() }
	}

	pub fn with_alternatives(identifier: impl Into<PackageId>, alternatives: impl IntoIterator<Item = impl Into<PackageId>>) -> Self {
		Self {
			identifier: identifier.into(),
			alternatives: alternatives.into_iter().map(Into::into).collect(),
		}
	}
}

/// A package as known to the catalog.
///
/// The relation sets and pin are the rules shipped inside the package itself,
/// see [`PackageRecord::declared_rules()`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
	pub identifier: PackageId,
	#[serde(default)]
	pub dependencies: Vec<Dependency>,
	#[serde(default)]
	pub load_after: BTreeSet<PackageId>,
	#[serde(default)]
	pub load_before: BTreeSet<PackageId>,
	#[serde(default)]
	pub incompatible_with: BTreeSet<PackageId>,
	#[serde(default)]
	pub pin: PinState,
}

impl PackageRecord {
	pub fn new(identifier: impl Into<PackageId>) -> Self {
		Self { identifier: identifier.into(), ..Default::default() }
	}

	pub fn depends_on(mut self, identifier: impl Into<PackageId>) -> Self {
		self.dependencies.push(Dependency::new(identifier));
		self
	}

	pub fn depends_on_any(mut self, identifier: impl Into<PackageId>, alternatives: impl IntoIterator<Item = impl Into<PackageId>>) -> Self {
		self.dependencies.push(Dependency::with_alternatives(identifier, alternatives));
		self
	}

	pub fn load_after(mut self, identifier: impl Into<PackageId>) -> Self {
		self.load_after.insert(identifier.into());
		self
	}

	pub fn load_before(mut self, identifier: impl Into<PackageId>) -> Self {
		self.load_before.insert(identifier.into());
		self
	}

	pub fn incompatible_with(mut self, identifier: impl Into<PackageId>) -> Self {
		self.incompatible_with.insert(identifier.into());
		self
	}

	pub fn pinned(mut self, pin: PinState) -> Self {
		self.pin = pin;
		self
	}

	/// The package's own ordering declarations as unqualified [`RuleSource::PackageDeclared`] entries.
	///
	/// Hard dependencies are not included, they are handled separately during aggregation.
	pub fn declared_rules(&self) -> Vec<RuleEntry> {
		let subject = &self.identifier;
		let mut rules = Vec::with_capacity(self.load_after.len() + self.load_before.len() + self.incompatible_with.len() + 1);

		for (relation, targets) in [
			(Relation::LoadAfter, &self.load_after),
			(Relation::LoadBefore, &self.load_before),
			(Relation::IncompatibleWith, &self.incompatible_with),
		] {
			for target in targets {
				rules.push(RuleEntry::new(RuleSource::PackageDeclared, subject.clone(), relation, Some(target.clone())));
			}
		}

		match self.pin {
			PinState::None => {},
			PinState::ForceTop => rules.push(RuleEntry::new(RuleSource::PackageDeclared, subject.clone(), Relation::ForceTop, None)),
			PinState::ForceBottom => rules.push(RuleEntry::new(RuleSource::PackageDeclared, subject.clone(), Relation::ForceBottom, None)),
		}

		rules
	}
}
