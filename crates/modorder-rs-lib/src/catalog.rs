//! Read-only snapshot of every known package, installed or available.

use std::collections::HashMap;

use crate::package::{PackageId, PackageRecord};

#[derive(Debug, Default, Clone)]
pub struct Catalog {
	packages: HashMap<PackageId, PackageRecord>,
}

impl Catalog {
	/// Builds a catalog from a list of records.
	///
	/// # Errors
	/// - [`DuplicatePackage`](crate::Error::DuplicatePackage) when two records share an identifier.
	/// - [`Validation`](crate::Error::Validation) when a record has an empty identifier.
	pub fn new(packages: impl IntoIterator<Item = PackageRecord>) -> crate::Result<Self> {
		let mut catalog = Self::default();
		for package in packages {
			catalog.insert(package)?;
		}
		Ok(catalog)
	}

	pub fn insert(&mut self, package: PackageRecord) -> crate::Result<()> {
		if package.identifier.is_empty() {
			return Err(crate::Error::Validation("package identifier is empty".to_string()));
		}
		if self.packages.contains_key(&package.identifier) {
			return Err(crate::Error::DuplicatePackage(package.identifier));
		}
		self.packages.insert(package.identifier.clone(), package);
		Ok(())
	}

	pub fn get(&self, identifier: &PackageId) -> Option<&PackageRecord> {
		self.packages.get(identifier)
	}

	pub fn contains(&self, identifier: &PackageId) -> bool {
		self.packages.contains_key(identifier)
	}

	pub fn len(&self) -> usize {
		self.packages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.packages.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &PackageRecord> {
		self.packages.values()
	}
}
