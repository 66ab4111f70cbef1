use serde::{Serialize, Deserialize};

use crate::package::GameVersion;

/// How ties between packages that are ready to be placed are broken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
	/// Keep packages as close as possible to the current active list.
	#[default] ReferenceOrder,
	/// Case-insensitive identifier order, the active list only breaks exact ties.
	Alphabetical,
}

/// Resolution-time settings.
///
/// These only affect a single run, nothing here is stored in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveOptions {
	game_version: Option<GameVersion>,
	alternative_ids: bool,
	exclude_invalid: bool,
	dependencies_imply_order: bool,
	tie_break: TieBreak,
}

impl Default for ResolveOptions {
	fn default() -> Self {
		Self {
			game_version: None,
			alternative_ids: true,
			exclude_invalid: false,
			dependencies_imply_order: true,
			tie_break: TieBreak::ReferenceOrder,
		}
	}
}

impl ResolveOptions {
	/// The game version used to pick version-qualified rules.
	/// when `None` qualified rules never apply.
	pub fn game_version(&self) -> Option<&GameVersion> {
		self.game_version.as_ref()
	}
	pub fn set_game_version(&mut self, game_version: Option<GameVersion>) {
		self.game_version = game_version;
	}

	/// Substitute alternative identifiers for dependencies missing from the catalog.
	pub fn alternative_ids(&self) -> bool {
		self.alternative_ids
	}
	pub fn set_alternative_ids(&mut self, alternative_ids: bool) {
		self.alternative_ids = alternative_ids;
	}

	/// Leave active packages that are missing from the catalog out of the order.
	pub fn exclude_invalid(&self) -> bool {
		self.exclude_invalid
	}
	pub fn set_exclude_invalid(&mut self, exclude_invalid: bool) {
		self.exclude_invalid = exclude_invalid;
	}

	/// Hard dependencies load before their dependents.
	pub fn dependencies_imply_order(&self) -> bool {
		self.dependencies_imply_order
	}
	pub fn set_dependencies_imply_order(&mut self, dependencies_imply_order: bool) {
		self.dependencies_imply_order = dependencies_imply_order;
	}

	pub fn tie_break(&self) -> TieBreak {
		self.tie_break
	}
	pub fn set_tie_break(&mut self, tie_break: TieBreak) {
		self.tie_break = tie_break;
	}

	/// Checks if a rule qualified for `qualifier` applies to this run.
	pub fn is_active_version(&self, qualifier: &GameVersion) -> bool {
		self.game_version.as_ref().is_some_and(|active| qualifier.is_compatible_with(active))
	}
}
