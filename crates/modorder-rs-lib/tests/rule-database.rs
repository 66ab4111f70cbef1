use modorder_rs::rules::{Relation, RuleSource};
use modorder_rs::{Error, GameVersion, PackageId, RuleDatabase, RuleEntry};
use modorder_rs_test_utils::*;

#[test]
fn package_declared_database_is_rejected() {
	assert!(matches!(RuleDatabase::new(RuleSource::PackageDeclared), Err(Error::ImmutableSource(RuleSource::PackageDeclared))));
}

#[test]
fn add_and_remove_rules() {
	init_logging();
	let mut db = RuleDatabase::new(RuleSource::User).unwrap();
	db.add(RuleEntry::load_after(RuleSource::User, "A", "B").with_comment("needs B's textures")).unwrap();
	db.add(RuleEntry::force_top(RuleSource::User, "C")).unwrap();
	assert_eq!(db.len(), 2);

	let removed = db.remove(&RuleEntry::load_after(RuleSource::User, "a", "b")).expect("rule present");
	assert_eq!(removed.comment.as_deref(), Some("needs B's textures"));
	assert_eq!(db.len(), 1);
	assert!(db.remove(&RuleEntry::load_after(RuleSource::User, "A", "B")).is_none());
}

#[test]
fn duplicate_is_rejected() {
	let mut db = RuleDatabase::new(RuleSource::Community).unwrap();
	db.add(RuleEntry::load_before(RuleSource::Community, "A", "B")).unwrap();

	let result = db.add(RuleEntry::load_before(RuleSource::Community, "A", "B").with_comment("different comment"));

	assert!(matches!(result, Err(Error::DuplicateRule(_))));
	assert_eq!(db.len(), 1);
}

#[test]
fn qualified_rule_is_not_a_duplicate_of_base_rule() {
	let mut db = RuleDatabase::new(RuleSource::Community).unwrap();
	db.add(RuleEntry::load_before(RuleSource::Community, "A", "B")).unwrap();
	db.add(RuleEntry::load_before(RuleSource::Community, "A", "B").for_game_version(GameVersion::new("1.5").unwrap())).unwrap();
	assert_eq!(db.len(), 2);
}

#[test]
fn rule_from_other_source_is_rejected() {
	let mut db = RuleDatabase::new(RuleSource::User).unwrap();
	assert!(matches!(db.add(RuleEntry::force_top(RuleSource::Community, "A")), Err(Error::Validation(_))));
}

#[test]
fn malformed_rules_are_rejected() {
	let mut db = RuleDatabase::new(RuleSource::User).unwrap();
	assert!(db.add(RuleEntry::new(RuleSource::User, "A", Relation::ForceTop, Some("B".into()))).is_err());
	assert!(db.add(RuleEntry::new(RuleSource::User, "A", Relation::LoadAfter, None)).is_err());
	assert!(db.add(RuleEntry::new(RuleSource::User, "", Relation::ForceTop, None)).is_err());
	assert!(db.add(RuleEntry::empty_override(RuleSource::User, "A", Relation::LoadAfter, GameVersion::new("1.5").unwrap())).is_ok());
}

#[test]
fn remove_subject_removes_every_rule() {
	let mut db = RuleDatabase::new(RuleSource::User).unwrap();
	db.add(RuleEntry::load_after(RuleSource::User, "A", "B")).unwrap();
	db.add(RuleEntry::load_after(RuleSource::User, "A", "C")).unwrap();
	db.add(RuleEntry::load_after(RuleSource::User, "B", "C")).unwrap();

	assert_eq!(db.remove_subject(&PackageId::new("a")), 2);
	assert_eq!(db.rules_for(&PackageId::new("B")).count(), 1);
	assert_eq!(db.rules_for(&PackageId::new("A")).count(), 0);
}

#[test]
fn json_round_trip_keeps_rules() {
	let mut db = RuleDatabase::new(RuleSource::Community).unwrap();
	db.add(RuleEntry::load_after(RuleSource::Community, "A", "B").for_game_version(GameVersion::new("v1.5").unwrap()).with_comment("1.5 only")).unwrap();
	db.add(RuleEntry::force_bottom(RuleSource::Community, "Z")).unwrap();

	let loaded = RuleDatabase::from_json_str(&db.to_json_string().unwrap()).unwrap();

	assert_eq!(loaded.source(), RuleSource::Community);
	assert_eq!(loaded.len(), 2);
	assert_eq!(loaded.entries()[0].game_version, Some(GameVersion::new("1.5").unwrap()));
	assert_eq!(loaded.entries()[0].comment.as_deref(), Some("1.5 only"));
}

#[test]
fn loading_skips_bad_entries() {
	init_logging();
	let json = r#"{
		"source": "User",
		"rules": [
			{ "source": "User", "subject": "A", "relation": "LoadAfter", "target": "B" },
			{ "source": "User", "subject": "a", "relation": "LoadAfter", "target": "b" },
			{ "source": "User", "subject": "C", "relation": "LoadAfter" },
			{ "source": "Community", "subject": "D", "relation": "ForceTop" }
		]
	}"#;

	let db = RuleDatabase::from_json_str(json).unwrap();

	assert_eq!(db.len(), 1);
	assert_eq!(db.entries()[0].subject, PackageId::new("A"));
}

#[test]
fn loading_package_declared_database_fails() {
	let json = r#"{ "source": "PackageDeclared", "rules": [] }"#;
	assert!(RuleDatabase::from_json_str(json).is_err());
}
