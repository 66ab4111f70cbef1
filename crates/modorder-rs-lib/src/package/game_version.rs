//! Game version numbers used to qualify rules.
//!
//! # Format
//!
//! `MAJOR`.`MINOR`.`PATCH`.`BUILD`, for example `1.5.4104`.
//! `MAJOR` and `MINOR` are required, `PATCH` and `BUILD` are optional.
//! Rule databases commonly write qualifiers with a leading `v` such as `v1.5`, this is accepted.
//!
//! # Applicability
//!
//! A qualifier like `1.5` is meant for every `1.5.x` release, so rules are matched with
//! [`GameVersion::is_compatible_with()`] and not with `Eq`.

use serde::{Serialize, Deserialize};
use try_map::FallibleMapExt;

/// Represents a specific game version.
///
/// # Eq & Ord
///
/// The `build` number is not considered in Eq and Ord, `1.5.4104` and `1.5.4104.1` are the same release.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameVersion {
	major: u32,
	minor: u32,
	patch: Option<u32>,
	build: Option<u32>,
}

impl GameVersion {
	/// Create a new [`GameVersion`] from a version string.
	///
	/// # Errors
	/// This function will return a [`Parse`](crate::Error::Parse) error in the following cases.
	/// - Input doesn't include a minor version.
	/// - Input has more components than the `MAJOR`.`MINOR`.`PATCH`.`BUILD` format.
	/// - The components of the version can't be parsed as integers.
	pub fn new(s: impl AsRef<str>) -> crate::Result<Self> {
		use crate::Error::Parse;
		let s = s.as_ref().trim();
		let s = s.strip_prefix(['v', 'V']).unwrap_or(s);
		let components = s.split('.').collect::<Vec<_>>();
		if components.len() < 2 || components.len() > 4 { return Err(Parse(format!("\"{}\" has too many/few version components", s))) }

		let major = components[0].parse::<u32>().map_err(|_| Parse("major version can't be parsed".into()))?;
		let minor = components[1].parse::<u32>().map_err(|_| Parse("minor version can't be parsed".into()))?;
		let patch = components.get(2).try_map(|v| v.parse::<u32>().map_err(|_| Parse("patch can't be parsed".into())))?;
		let build = components.get(3).try_map(|v| v.parse::<u32>().map_err(|_| Parse("build can't be parsed".into())))?;

		Ok(GameVersion { major, minor, patch, build })
	}

	/// Checks if a rule qualified with `self` applies to the `active` game version.
	///
	/// # How This Is Defined
	/// 1. `major` and `minor` must match.
	/// 1. If `patch` is present in both, `self <= active`.
	/// any other combination of patch options is considered compatible.
	pub fn is_compatible_with(&self, active: &Self) -> bool {
		if self.major() == active.major() && self.minor() == active.minor() {
			match (self.patch(), active.patch()) {
				(Some(lhs), Some(rhs)) => lhs <= rhs,
				_ => true,
			}
		} else {
			false
		}
	}

	pub fn major(&self) -> u32 { self.major }
	pub fn minor(&self) -> u32 { self.minor }
	pub fn patch(&self) -> Option<u32> { self.patch }
	pub fn build(&self) -> Option<u32> { self.build }
}

impl TryFrom<&str> for GameVersion {
	type Error = crate::Error;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl TryFrom<String> for GameVersion {
	type Error = crate::Error;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<GameVersion> for String {
	fn from(value: GameVersion) -> Self {
		value.to_string()
	}
}

impl std::fmt::Display for GameVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}", self.major, self.minor)?;
		if let Some(patch) = self.patch {
			write!(f, ".{}", patch)?;
			if let Some(build) = self.build {
				write!(f, ".{}", build)?;
			}
		}
		Ok(())
	}
}

impl PartialEq for GameVersion {
	fn eq(&self, other: &Self) -> bool {
		self.major() == other.major() &&
		self.minor() == other.minor() &&
		self.patch() == other.patch()
	}
}

impl std::hash::Hash for GameVersion {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.major.hash(state);
		self.minor.hash(state);
		self.patch.hash(state);
	}
}

impl Ord for GameVersion {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		(self.major(), self.minor(), self.patch()).cmp(&(other.major(), other.minor(), other.patch()))
	}
}

impl PartialOrd for GameVersion {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> { Some(self.cmp(other)) }
}
