use std::collections::HashMap;

use super::LoadOrderResolver;
use crate::catalog::Catalog;
use crate::package::{GameVersion, PackageId, PackageRecord};
use crate::rules::{RuleDatabase, RuleEntry};
use crate::ResolveOptions;

pub struct ResolverBuilder<'c> {
	catalog: &'c Catalog,
	active: Vec<PackageRecord>,
	rules: Vec<RuleEntry>,
	options: ResolveOptions,
}

impl<'c> ResolverBuilder<'c> {
	pub fn new(catalog: &'c Catalog) -> Self {
		Self {
			catalog,
			active: Default::default(),
			rules: Default::default(),
			options: Default::default(),
		}
	}

	/// Appends active packages, the order given is the reference order.
	pub fn active_packages(mut self, records: impl IntoIterator<Item = PackageRecord>) -> Self {
		self.active.extend(records);
		self
	}

	/// Appends active packages by identifier, taking their records from the catalog.
	///
	/// Identifiers missing from the catalog get a record with no relations.
	pub fn active_identifiers(mut self, identifiers: impl IntoIterator<Item = impl Into<PackageId>>) -> Self {
		for identifier in identifiers {
			let identifier = identifier.into();
			let record = self.catalog.get(&identifier).cloned().unwrap_or_else(|| {
				log::debug!("Active package {} is not in the catalog", identifier);
				PackageRecord::new(identifier)
			});
			self.active.push(record);
		}
		self
	}

	pub fn rules(mut self, entries: impl IntoIterator<Item = RuleEntry>) -> Self {
		self.rules.extend(entries);
		self
	}

	pub fn rule_database(mut self, database: &RuleDatabase) -> Self {
		self.rules.extend(database.entries().iter().cloned());
		self
	}

	pub fn options(mut self, options: ResolveOptions) -> Self {
		self.options = options;
		self
	}

	pub fn game_version(mut self, game_version: GameVersion) -> Self {
		self.options.set_game_version(Some(game_version));
		self
	}

	pub fn alternative_ids(mut self, enabled: bool) -> Self {
		self.options.set_alternative_ids(enabled);
		self
	}

	pub fn build(self) -> LoadOrderResolver<'c> {
		let mut rules = HashMap::<PackageId, Vec<RuleEntry>>::new();
		for rule in self.rules {
			rules.entry(rule.subject.clone()).or_default().push(rule);
		}

		LoadOrderResolver::new(self.catalog, self.active, rules, self.options)
	}
}
