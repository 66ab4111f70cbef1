//! Ordering and compatibility declarations.
//!
//! Rules come from three independent sources, in increasing precedence:
//! 1. [`RuleSource::PackageDeclared`] - shipped inside the package, read-only.
//! 1. [`RuleSource::Community`] - a shared rule database.
//! 1. [`RuleSource::User`] - the local user's overrides.
//!
//! Community and user rules are kept in a [`RuleDatabase`].

use serde::{Serialize, Deserialize};

use crate::package::{GameVersion, PackageId};

mod database;
pub use database::RuleDatabase;

/// Where a rule came from.
///
/// The `Ord` implementation is the precedence order, later variants override earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleSource {
	PackageDeclared,
	Community,
	User,
}

impl RuleSource {
	/// Package-declared rules can never be edited.
	pub fn is_editable(&self) -> bool {
		!matches!(self, RuleSource::PackageDeclared)
	}
}

impl std::fmt::Display for RuleSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			RuleSource::PackageDeclared => write!(f, "package"),
			RuleSource::Community => write!(f, "community"),
			RuleSource::User => write!(f, "user"),
		}
	}
}

impl std::str::FromStr for RuleSource {
	type Err = crate::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"package" | "packagedeclared" => Ok(RuleSource::PackageDeclared),
			"community" => Ok(RuleSource::Community),
			"user" => Ok(RuleSource::User),
			_ => Err(crate::Error::Parse(format!("unknown rule source \"{}\"", s))),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Relation {
	/// Subject must load after the target.
	LoadAfter,
	/// Subject must load before the target.
	LoadBefore,
	/// Subject should not be active alongside the target. Has no effect on ordering.
	IncompatibleWith,
	ForceTop,
	ForceBottom,
}

impl Relation {
	/// Relations which pin a package instead of relating it to another.
	pub fn is_pin(&self) -> bool {
		matches!(self, Relation::ForceTop | Relation::ForceBottom)
	}
}

impl std::fmt::Display for Relation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			Relation::LoadAfter => "load-after",
			Relation::LoadBefore => "load-before",
			Relation::IncompatibleWith => "incompatible-with",
			Relation::ForceTop => "force-top",
			Relation::ForceBottom => "force-bottom",
		};
		write!(f, "{}", s)
	}
}

impl std::str::FromStr for Relation {
	type Err = crate::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().replace('_', "-").as_str() {
			"load-after" | "loadafter" | "after" => Ok(Relation::LoadAfter),
			"load-before" | "loadbefore" | "before" => Ok(Relation::LoadBefore),
			"incompatible-with" | "incompatiblewith" | "incompatible" => Ok(Relation::IncompatibleWith),
			"force-top" | "forcetop" | "top" => Ok(Relation::ForceTop),
			"force-bottom" | "forcebottom" | "bottom" => Ok(Relation::ForceBottom),
			_ => Err(crate::Error::Parse(format!("unknown relation \"{}\"", s))),
		}
	}
}

/// A single declaration from one rule source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
	pub source: RuleSource,
	pub subject: PackageId,
	pub relation: Relation,
	/// Absent for pins.
	///
	/// Also absent on a version-qualified set relation that declares an empty override.
	#[serde(default)]
	pub target: Option<PackageId>,
	/// When present the rule only applies to this game version and replaces the unqualified rules of the same relation.
	#[serde(default)]
	pub game_version: Option<GameVersion>,
	#[serde(default)]
	pub comment: Option<String>,
}

impl RuleEntry {
	pub fn new(source: RuleSource, subject: impl Into<PackageId>, relation: Relation, target: Option<PackageId>) -> Self {
		Self {
			source,
			subject: subject.into(),
			relation,
			target,
			game_version: None,
			comment: None,
		}
	}

	pub fn load_after(source: RuleSource, subject: impl Into<PackageId>, target: impl Into<PackageId>) -> Self {
		Self::new(source, subject, Relation::LoadAfter, Some(target.into()))
	}

	pub fn load_before(source: RuleSource, subject: impl Into<PackageId>, target: impl Into<PackageId>) -> Self {
		Self::new(source, subject, Relation::LoadBefore, Some(target.into()))
	}

	pub fn incompatible_with(source: RuleSource, subject: impl Into<PackageId>, target: impl Into<PackageId>) -> Self {
		Self::new(source, subject, Relation::IncompatibleWith, Some(target.into()))
	}

	pub fn force_top(source: RuleSource, subject: impl Into<PackageId>) -> Self {
		Self::new(source, subject, Relation::ForceTop, None)
	}

	pub fn force_bottom(source: RuleSource, subject: impl Into<PackageId>) -> Self {
		Self::new(source, subject, Relation::ForceBottom, None)
	}

	/// An explicit empty override of `relation` for `game_version`.
	///
	/// While that version is active every unqualified `relation` rule of the subject is discarded.
	pub fn empty_override(source: RuleSource, subject: impl Into<PackageId>, relation: Relation, game_version: GameVersion) -> Self {
		Self::new(source, subject, relation, None).for_game_version(game_version)
	}

	pub fn for_game_version(mut self, game_version: GameVersion) -> Self {
		self.game_version = Some(game_version);
		self
	}

	pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
		self.comment = Some(comment.into());
		self
	}

	/// Two rules are duplicates when everything but the comment matches.
	pub fn is_duplicate_of(&self, other: &Self) -> bool {
		self.source == other.source
			&& self.subject == other.subject
			&& self.relation == other.relation
			&& self.target == other.target
			&& self.game_version == other.game_version
	}

	/// Returns why the rule can't be used, if anything.
	pub fn malformed_reason(&self) -> Option<&'static str> {
		if self.subject.is_empty() {
			return Some("subject is empty");
		}
		match (self.relation.is_pin(), &self.target) {
			(true, Some(_)) => Some("pin relations take no target"),
			(false, None) if self.game_version.is_none() => Some("only version-qualified rules may omit the target"),
			(false, Some(t)) if t.is_empty() => Some("target is empty"),
			_ => None,
		}
	}
}

impl std::fmt::Display for RuleEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "[{}] {} {}", self.source, self.subject, self.relation)?;
		if let Some(target) = &self.target {
			write!(f, " {}", target)?;
		}
		if let Some(version) = &self.game_version {
			write!(f, " (v{})", version)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test] fn rule_source_precedence() { assert!(RuleSource::PackageDeclared < RuleSource::Community && RuleSource::Community < RuleSource::User) }
	#[test] fn relation_parses_kebab_case() { assert_eq!("load-after".parse::<Relation>().unwrap(), Relation::LoadAfter) }
	#[test] fn relation_parses_short_form() { assert_eq!("Bottom".parse::<Relation>().unwrap(), Relation::ForceBottom) }
	#[test] fn relation_rejects_unknown() { assert!("sideways".parse::<Relation>().is_err()) }
	#[test] fn rule_display() { assert_eq!(RuleEntry::load_after(RuleSource::User, "A", "B").for_game_version(GameVersion::new("1.5").unwrap()).to_string(), "[user] A load-after B (v1.5)") }
	#[test] fn rule_pin_with_target_is_malformed() { assert!(RuleEntry::new(RuleSource::User, "A", Relation::ForceTop, Some("B".into())).malformed_reason().is_some()) }
	#[test] fn rule_duplicate_ignores_comment() { assert!(RuleEntry::force_top(RuleSource::User, "A").with_comment("x").is_duplicate_of(&RuleEntry::force_top(RuleSource::User, "a"))) }
}
