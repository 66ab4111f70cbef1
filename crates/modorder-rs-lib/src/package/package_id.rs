use serde::{Serialize, Deserialize};

/// A case-insensitive package identifier.
///
/// The original spelling is kept for display while comparisons, hashing and ordering
/// all use a trimmed lowercase key. `"Author.Mod"` and `"author.mod"` are the same package.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PackageId {
	name: String,
	key: String,
}

impl PackageId {
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into().trim().to_string();
		let key = name.to_lowercase();
		Self { name, key }
	}

	/// The identifier as originally written.
	pub fn as_str(&self) -> &str {
		&self.name
	}

	/// The normalized key used for comparisons.
	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn is_empty(&self) -> bool {
		self.key.is_empty()
	}
}

impl std::hash::Hash for PackageId {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}

impl std::cmp::PartialEq for PackageId {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl std::cmp::Eq for PackageId {}

impl std::cmp::Ord for PackageId {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.key.cmp(&other.key)
	}
}

impl std::cmp::PartialOrd for PackageId {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::fmt::Display for PackageId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name)
	}
}

impl From<String> for PackageId {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for PackageId {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<&PackageId> for PackageId {
	fn from(value: &PackageId) -> Self {
		value.clone()
	}
}

impl From<PackageId> for String {
	fn from(value: PackageId) -> Self {
		value.name
	}
}

impl AsRef<PackageId> for PackageId {
	fn as_ref(&self) -> &PackageId {
		self
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test] fn package_id_ignores_case() { assert_eq!(PackageId::new("Author.Mod"), PackageId::new("author.mod")) }
	#[test] fn package_id_ignores_surrounding_whitespace() { assert_eq!(PackageId::new("  author.mod "), PackageId::new("author.mod")) }
	#[test] fn package_id_keeps_display_case() { assert_eq!(PackageId::new("Author.Mod").to_string(), "Author.Mod") }
	#[test] fn package_id_orders_by_key() { assert!(PackageId::new("B.mod") > PackageId::new("a.mod")) }
	#[test] fn package_id_different_names_are_ne() { assert_ne!(PackageId::new("a.mod"), PackageId::new("a.mod.dev")) }
	#[test] fn package_id_serializes_as_string() { assert_eq!(serde_json::to_string(&PackageId::new("Author.Mod")).unwrap(), "\"Author.Mod\"") }
	#[test] fn package_id_deserializes_from_string() { assert_eq!(serde_json::from_str::<PackageId>("\"AUTHOR.MOD\"").unwrap(), PackageId::new("author.mod")) }
}
