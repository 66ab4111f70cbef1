//! Files read and written by the terminal.

use std::path::Path;

use modorder_rs::rules::RuleSource;
use modorder_rs::{Catalog, GameVersion, PackageId, PackageRecord, RuleDatabase, RuleEntry};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A mod list to sort.
///
/// `active` is the current load order. When it is empty every package is active in the listed order.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Snapshot {
	#[serde(default)]
	pub packages: Vec<PackageRecord>,
	#[serde(default)]
	pub active: Vec<PackageId>,
	/// Extra rules of any source, applied on top of the rule databases.
	#[serde(default)]
	pub rules: Vec<RuleEntry>,
	#[serde(default)]
	pub game_version: Option<GameVersion>,
}

impl Snapshot {
	pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
		let path = path.as_ref();
		log::trace!("Loading snapshot from {}", path.display());
		let data = std::fs::read_to_string(path)?;
		let snapshot = serde_json::from_str::<Snapshot>(&data).map_err(modorder_rs::Error::from)?;
		log::debug!("Snapshot holds {} packages, {} active", snapshot.packages.len(), snapshot.active.len());
		Ok(snapshot)
	}

	pub fn catalog(&self) -> Result<Catalog, Error> {
		Ok(Catalog::new(self.packages.iter().cloned())?)
	}

	pub fn active_identifiers(&self) -> Vec<PackageId> {
		if self.active.is_empty() {
			self.packages.iter().map(|p| p.identifier.clone()).collect()
		} else {
			self.active.clone()
		}
	}
}

pub fn load_rule_database(path: impl AsRef<Path>) -> Result<RuleDatabase, Error> {
	let path = path.as_ref();
	log::trace!("Loading rule database from {}", path.display());
	let data = std::fs::read_to_string(path)?;
	Ok(RuleDatabase::from_json_str(&data)?)
}

/// Loads the database at `path`, which must hold `source` rules.
pub fn load_rule_database_of(path: impl AsRef<Path>, source: RuleSource) -> Result<RuleDatabase, Error> {
	let db = load_rule_database(path)?;
	if db.source() != source {
		return Err(Error::SourceMismatch { expected: source, found: db.source() });
	}
	Ok(db)
}

/// Loads the database at `path`, or creates an empty one for `source` if the file doesn't exist.
///
/// An existing database must belong to `source`.
pub fn load_or_create_rule_database(path: impl AsRef<Path>, source: RuleSource) -> Result<RuleDatabase, Error> {
	let path = path.as_ref();
	match load_rule_database_of(path, source) {
		Ok(db) => Ok(db),
		Err(Error::IO(e)) if e.kind() == std::io::ErrorKind::NotFound => {
			log::info!("Creating new {} rule database at {}", source, path.display());
			Ok(RuleDatabase::new(source)?)
		},
		Err(e) => Err(e),
	}
}

pub fn save_rule_database(path: impl AsRef<Path>, db: &RuleDatabase) -> Result<(), Error> {
	let path = path.as_ref();
	log::debug!("Saving {} rule database to {}", db.source(), path.display());
	std::fs::write(path, db.to_json_string()?)?;
	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn snapshot_loads_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("snapshot.json");
		std::fs::write(&path, r#"{
			"packages": [
				{ "identifier": "A", "load_after": ["B"] },
				{ "identifier": "B", "pin": "ForceTop" }
			],
			"active": ["b", "a"],
			"game_version": "v1.5"
		}"#).unwrap();

		let snapshot = Snapshot::load(&path).unwrap();

		assert_eq!(snapshot.catalog().unwrap().len(), 2);
		assert_eq!(snapshot.active_identifiers(), vec![PackageId::new("B"), PackageId::new("A")]);
		assert_eq!(snapshot.game_version, Some(GameVersion::new("1.5").unwrap()));
	}

	#[test]
	fn snapshot_without_active_list_uses_packages() {
		let snapshot: Snapshot = serde_json::from_str(r#"{ "packages": [{ "identifier": "A" }, { "identifier": "B" }] }"#).unwrap();
		assert_eq!(snapshot.active_identifiers(), vec![PackageId::new("A"), PackageId::new("B")]);
	}

	#[test]
	fn missing_database_is_created() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("user.json");

		let mut db = load_or_create_rule_database(&path, RuleSource::User).unwrap();
		assert!(db.is_empty());

		db.add(RuleEntry::load_after(RuleSource::User, "A", "B")).unwrap();
		save_rule_database(&path, &db).unwrap();

		let loaded = load_rule_database(&path).unwrap();
		assert_eq!(loaded.len(), 1);
		assert_eq!(loaded.source(), RuleSource::User);
	}

	#[test]
	fn database_of_other_source_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("community.json");
		save_rule_database(&path, &RuleDatabase::new(RuleSource::Community).unwrap()).unwrap();

		let result = load_or_create_rule_database(&path, RuleSource::User);

		assert!(matches!(result, Err(Error::SourceMismatch { expected: RuleSource::User, found: RuleSource::Community })));
	}

	#[test]
	fn database_passed_for_wrong_source_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("user.json");
		save_rule_database(&path, &RuleDatabase::new(RuleSource::User).unwrap()).unwrap();

		assert!(load_rule_database_of(&path, RuleSource::User).is_ok());
		assert!(matches!(
			load_rule_database_of(&path, RuleSource::Community),
			Err(Error::SourceMismatch { expected: RuleSource::Community, found: RuleSource::User })
		));
	}

	#[test]
	fn broken_snapshot_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("broken.json");
		std::fs::write(&path, "{ not json").unwrap();

		assert!(matches!(Snapshot::load(&path), Err(Error::ModOrder(_))));
	}
}
