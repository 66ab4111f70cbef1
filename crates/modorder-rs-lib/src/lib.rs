pub mod error;
pub use error::Result;
pub use error::Error;

pub mod package;
pub use package::PackageId;
pub use package::PackageRecord;
pub use package::GameVersion;

pub mod catalog;
pub use catalog::Catalog;

pub mod rules;
pub use rules::RuleEntry;
pub use rules::RuleDatabase;

pub mod config;
pub use config::ResolveOptions;
pub use config::TieBreak;

pub mod load_order;
