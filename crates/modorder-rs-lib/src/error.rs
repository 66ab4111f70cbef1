//! Library error type.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

use crate::package::PackageId;
use crate::rules::{RuleEntry, RuleSource};

#[derive(Debug, Error)]
pub enum Error {
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("parsing error: {0}")]
	Parse(String),
	#[error("validation error: {0}")]
	Validation(String),
	#[error("rule already exists: {0}")]
	DuplicateRule(Box<RuleEntry>),
	#[error("rules from source {0:?} are read-only")]
	ImmutableSource(RuleSource),
	#[error("package `{0}` already exists in the catalog")]
	DuplicatePackage(PackageId),
	#[error("package `{0}` can't be ordered relative to itself")]
	SelfEdge(PackageId),
	#[error("package `{0}` is not a node of the graph")]
	UnknownNode(PackageId),
}
