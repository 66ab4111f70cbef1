use serde::{Serialize, Deserialize};

use super::{RuleEntry, RuleSource};
use crate::package::PackageId;

/// The editable rules of a single source.
///
/// Only [`RuleSource::Community`] and [`RuleSource::User`] rules can be stored,
/// package-declared rules belong to the package and are never edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDatabase {
	source: RuleSource,
	rules: Vec<RuleEntry>,
}

impl RuleDatabase {
	/// # Errors
	/// - [`ImmutableSource`](crate::Error::ImmutableSource) for [`RuleSource::PackageDeclared`].
	pub fn new(source: RuleSource) -> crate::Result<Self> {
		if !source.is_editable() {
			return Err(crate::Error::ImmutableSource(source));
		}
		Ok(Self { source, rules: Default::default() })
	}

	pub fn source(&self) -> RuleSource {
		self.source
	}

	/// Adds a new rule.
	///
	/// # Errors
	/// - [`Validation`](crate::Error::Validation) when the rule belongs to another source or is malformed.
	/// - [`DuplicateRule`](crate::Error::DuplicateRule) when an identical rule is already present.
	pub fn add(&mut self, entry: RuleEntry) -> crate::Result<()> {
		if entry.source != self.source {
			return Err(crate::Error::Validation(format!("a {} rule can't be added to the {} database", entry.source, self.source)));
		}
		if let Some(reason) = entry.malformed_reason() {
			return Err(crate::Error::Validation(format!("{}: {}", entry, reason)));
		}
		if self.contains(&entry) {
			return Err(crate::Error::DuplicateRule(Box::new(entry)));
		}
		self.rules.push(entry);
		Ok(())
	}

	/// Removes the rule matching `entry`, comments are ignored when matching.
	pub fn remove(&mut self, entry: &RuleEntry) -> Option<RuleEntry> {
		let i = self.rules.iter().position(|r| r.is_duplicate_of(entry))?;
		Some(self.rules.remove(i))
	}

	/// Removes every rule about `subject`, returning how many were removed.
	pub fn remove_subject(&mut self, subject: &PackageId) -> usize {
		let before = self.rules.len();
		self.rules.retain(|r| &r.subject != subject);
		before - self.rules.len()
	}

	pub fn contains(&self, entry: &RuleEntry) -> bool {
		self.rules.iter().any(|r| r.is_duplicate_of(entry))
	}

	pub fn rules_for<'a>(&'a self, subject: &'a PackageId) -> impl Iterator<Item = &'a RuleEntry> + 'a {
		self.rules.iter().filter(move |r| &r.subject == subject)
	}

	pub fn entries(&self) -> &[RuleEntry] {
		&self.rules
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// Reads a database from JSON.
	///
	/// Duplicate and malformed rules are skipped with a warning instead of failing the whole database.
	pub fn from_json_str(s: &str) -> crate::Result<Self> {
		let raw: RuleDatabase = serde_json::from_str(s)?;
		let mut db = Self::new(raw.source)?;
		for entry in raw.rules {
			match db.add(entry) {
				Ok(()) => {},
				Err(e @ (crate::Error::DuplicateRule(_) | crate::Error::Validation(_))) => log::warn!("Skipping rule while loading {} database: {}", db.source, e),
				Err(e) => return Err(e),
			}
		}
		Ok(db)
	}

	pub fn to_json_string(&self) -> crate::Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}
