//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use modorder_rs::load_order::{ResolveReport, ResolverBuilder};
use modorder_rs::{Catalog, PackageId, PackageRecord, ResolveOptions, RuleEntry};

/// Sends log output to the test harness, safe to call from every test.
pub fn init_logging() {
	let _ = env_logger::builder().is_test(true).try_init();
}

/// A package with no relations.
pub fn package(identifier: &str) -> PackageRecord {
	PackageRecord::new(identifier)
}

pub fn ids(identifiers: &[&str]) -> Vec<PackageId> {
	identifiers.iter().map(|i| PackageId::new(*i)).collect()
}

/// Gets a catalog holding exactly `records`
pub fn catalog_of(records: &[PackageRecord]) -> modorder_rs::Result<Catalog> {
	Catalog::new(records.iter().cloned())
}

/// Resolves `records` as the active list, every record is also in the catalog.
pub fn resolve_records(records: &[PackageRecord], rules: &[RuleEntry], options: ResolveOptions) -> modorder_rs::Result<ResolveReport> {
	let catalog = catalog_of(records)?;
	let report = ResolverBuilder::new(&catalog)
		.active_packages(records.iter().cloned())
		.rules(rules.iter().cloned())
		.options(options)
		.build()
		.resolve();
	Ok(report)
}

/// Position of `identifier` in `order`.
pub fn position_of(order: &[PackageId], identifier: &str) -> Option<usize> {
	let identifier = PackageId::new(identifier);
	order.iter().position(|p| *p == identifier)
}
