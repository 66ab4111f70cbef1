//! Merges every rule source of a package into one [`CanonicalConstraintSet`].
//!
//! Entries are folded in precedence order ([`RuleSource`]'s `Ord`), package-declared first and user last.
//! - Set relations (`LoadAfter`, `LoadBefore`, `IncompatibleWith`) are unioned across sources.
//! - Pins are replaced, the highest precedence source wins.
//! - A version-qualified entry for the active game version replaces every unqualified entry
//! of the same relation, from every source. An empty qualified entry therefore clears the relation.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::Diagnostic;
use crate::catalog::Catalog;
use crate::package::{GameVersion, PackageId, PackageRecord, PinState};
use crate::rules::{Relation, RuleEntry, RuleSource};
use crate::ResolveOptions;

/// The resolved relations of one package for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalConstraintSet {
	pub identifier: PackageId,
	pub pin: PinState,
	pub load_after: BTreeSet<PackageId>,
	pub load_before: BTreeSet<PackageId>,
	pub incompatible_with: BTreeSet<PackageId>,
	pub dependencies: Vec<EffectiveDependency>,
}

/// A hard dependency with the identifiers able to satisfy it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EffectiveDependency {
	pub requested: PackageId,
	/// Known identifiers in order of preference, the requested identifier first when known.
	///
	/// Empty when neither the dependency nor any alternative is known.
	pub candidates: Vec<PackageId>,
}

/// Identifiers that exist in the catalog or the active list.
#[derive(Debug, Clone, Copy)]
pub struct KnownPackages<'a> {
	catalog: &'a Catalog,
	active: &'a HashSet<PackageId>,
}

impl<'a> KnownPackages<'a> {
	pub fn new(catalog: &'a Catalog, active: &'a HashSet<PackageId>) -> Self {
		Self { catalog, active }
	}

	pub fn contains(&self, identifier: &PackageId) -> bool {
		self.active.contains(identifier) || self.catalog.contains(identifier)
	}
}

#[derive(Debug, Default)]
struct SetFold {
	base: BTreeSet<PackageId>,
	versioned: Option<BTreeSet<PackageId>>,
}

impl SetFold {
	/// Marks that a qualified variant exists even if it adds nothing.
	fn declare_versioned(&mut self) -> &mut BTreeSet<PackageId> {
		self.versioned.get_or_insert_with(Default::default)
	}

	fn finish(self) -> BTreeSet<PackageId> {
		self.versioned.unwrap_or(self.base)
	}
}

#[derive(Debug, Default)]
struct PinFold {
	base: Option<PinState>,
	versioned: Option<PinState>,
}

impl PinFold {
	fn finish(self) -> PinState {
		self.versioned.or(self.base).unwrap_or_default()
	}
}

#[derive(Debug, Default)]
struct ConstraintFold {
	load_after: SetFold,
	load_before: SetFold,
	incompatible_with: SetFold,
	pin: PinFold,
}

impl ConstraintFold {
	fn set_mut(&mut self, relation: Relation) -> Option<&mut SetFold> {
		match relation {
			Relation::LoadAfter => Some(&mut self.load_after),
			Relation::LoadBefore => Some(&mut self.load_before),
			Relation::IncompatibleWith => Some(&mut self.incompatible_with),
			Relation::ForceTop | Relation::ForceBottom => None,
		}
	}
}

type RuleIdentity = (RuleSource, Relation, Option<PackageId>, Option<GameVersion>);

/// Builds the canonical constraints of `record`.
///
/// `rules` may contain entries for other subjects, they are ignored.
/// Problems with individual rules are pushed onto `diagnostics` and the rule is skipped.
pub fn aggregate(record: &PackageRecord, rules: &[RuleEntry], known: KnownPackages, options: &ResolveOptions, diagnostics: &mut Vec<Diagnostic>) -> CanonicalConstraintSet {
	let mut entries = record.declared_rules();
	entries.extend(rules.iter().filter(|r| r.subject == record.identifier).cloned());
	/* Stable so the record's own rules stay ahead of any other package-declared entries */
	entries.sort_by_key(|r| r.source);

	let mut seen = HashSet::<RuleIdentity>::with_capacity(entries.len());
	let mut fold = ConstraintFold::default();

	for entry in entries {
		if let Some(reason) = entry.malformed_reason() {
			log::warn!("Skipping malformed rule {}: {}", entry, reason);
			diagnostics.push(Diagnostic::MalformedRule(entry, reason));
			continue;
		}

		if !seen.insert((entry.source, entry.relation, entry.target.clone(), entry.game_version.clone())) {
			log::warn!("Skipping duplicate rule {}", entry);
			diagnostics.push(Diagnostic::DuplicateRule(entry));
			continue;
		}

		let qualified = match &entry.game_version {
			Some(v) if options.is_active_version(v) => true,
			Some(_) => {
				log::trace!("Rule {} is for another game version", entry);
				continue;
			},
			None => false,
		};

		if let Some(set) = fold.set_mut(entry.relation) {
			/* The variant exists even when its target turns out to be unusable */
			let targets = if qualified { set.declare_versioned() } else { &mut set.base };
			if let Some(target) = entry.target {
				if known.contains(&target) {
					targets.insert(target);
				} else {
					log::debug!("Rule {} refers to unknown package {}", entry.subject, target);
					diagnostics.push(Diagnostic::UnknownPackageReference { origin: entry.source, subject: entry.subject, target });
				}
			}
		} else {
			let pin = if entry.relation == Relation::ForceTop { PinState::ForceTop } else { PinState::ForceBottom };
			if qualified {
				fold.pin.versioned = Some(pin);
			} else {
				fold.pin.base = Some(pin);
			}
		}
	}

	let dependencies = record.dependencies.iter().map(|dependency| {
		let mut candidates = Vec::<PackageId>::with_capacity(1 + dependency.alternatives.len());
		if known.contains(&dependency.identifier) {
			candidates.push(dependency.identifier.clone());
		}
		if options.alternative_ids() {
			for alternative in &dependency.alternatives {
				if known.contains(alternative) && !candidates.contains(alternative) {
					candidates.push(alternative.clone());
				}
			}
		}
		EffectiveDependency { requested: dependency.identifier.clone(), candidates }
	}).collect();

	CanonicalConstraintSet {
		identifier: record.identifier.clone(),
		pin: fold.pin.finish(),
		load_after: fold.load_after.finish(),
		load_before: fold.load_before.finish(),
		incompatible_with: fold.incompatible_with.finish(),
		dependencies,
	}
}
