use std::process::ExitCode;

use modorder_rs::load_order::{ResolveReport, ResolverBuilder};
use modorder_rs::rules::{Relation, RuleSource};
use modorder_rs::{GameVersion, PackageId, ResolveOptions, RuleDatabase, RuleEntry, TieBreak};

mod snapshot;
use snapshot::Snapshot;

#[tokio::main]
async fn main() -> ExitCode {
	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",                "Show help");
		opts.optflag( "v", "verbose",             "Increased vebosity");
		opts.optopt(  "g", "game-version",        "Active game version for version specific rules", "VERSION");
		opts.optopt(  "c", "community",           "Community rule database", "FILE");
		opts.optopt(  "u", "user",                "User rule database", "FILE");
		opts.optflag( "",  "no-alternatives",     "Don't substitute alternative identifiers for missing dependencies");
		opts.optflag( "",  "exclude-invalid",     "Leave packages missing from the catalog out of the order");
		opts.optflag( "",  "no-dependency-order", "Don't load dependencies before their dependents");
		opts.optflag( "",  "alphabetical",        "Break ties alphabetically instead of keeping the current order");
		opts.optopt(  "",  "comment",             "Comment stored with a new rule", "TEXT");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return ExitCode::FAILURE }
		};

		if parsed_options.opt_present("h") || parsed_options.free.is_empty() {
			eprintln!("{}", opts.usage(USAGE));
			return ExitCode::SUCCESS;
		}

		parsed_options
	};

	let mut logger = env_logger::Builder::from_default_env();
	if parsed_options.opt_present("v") {
		logger.filter_level(log::LevelFilter::Debug);
	}
	logger.init();

	let free = &parsed_options.free;
	let result = match free[0].as_str() {
		"sort" => sort(&parsed_options).await,
		"rule" => match free.get(1).map(String::as_str) {
			Some("add") => add_rule(&parsed_options),
			Some("remove") => remove_rule(&parsed_options),
			Some("list") => list_rules(&parsed_options),
			_ => Err(Error::UnknownCommand(free[1..].join(" "))),
		},
		other => Err(Error::UnknownCommand(other.to_string())),
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(Error::Unordered) => {
			log::error!("No load order could be produced.");
			ExitCode::from(2)
		},
		Err(e) => {
			log::error!("{}", e);
			ExitCode::FAILURE
		},
	}
}

const USAGE: &str = "Usage:
	modorder-rs-terminal [options] sort SNAPSHOT
	modorder-rs-terminal [options] rule add DB SOURCE SUBJECT RELATION [TARGET]
	modorder-rs-terminal [options] rule remove DB SUBJECT RELATION [TARGET]
	modorder-rs-terminal [options] rule list DB [SUBJECT]";

fn resolve_options(parsed_options: &getopts::Matches, game_version: Option<GameVersion>) -> ResolveOptions {
	let mut options = ResolveOptions::default();
	options.set_game_version(game_version);
	options.set_alternative_ids(!parsed_options.opt_present("no-alternatives"));
	options.set_exclude_invalid(parsed_options.opt_present("exclude-invalid"));
	options.set_dependencies_imply_order(!parsed_options.opt_present("no-dependency-order"));
	if parsed_options.opt_present("alphabetical") {
		options.set_tie_break(TieBreak::Alphabetical);
	}
	options
}

fn game_version_option(parsed_options: &getopts::Matches) -> Result<Option<GameVersion>, Error> {
	Ok(parsed_options.opt_str("g").map(GameVersion::new).transpose()?)
}

async fn sort(parsed_options: &getopts::Matches) -> Result<(), Error> {
	let path = parsed_options.free.get(1).ok_or(Error::MissingArgument("SNAPSHOT"))?;
	let snapshot = Snapshot::load(path)?;

	/* Command line version takes priority over the snapshot's */
	let game_version = game_version_option(parsed_options)?.or_else(|| snapshot.game_version.clone());
	let options = resolve_options(parsed_options, game_version);

	let mut databases = Vec::<RuleDatabase>::new();
	for (flag, source) in [("c", RuleSource::Community), ("u", RuleSource::User)] {
		if let Some(path) = parsed_options.opt_str(flag) {
			databases.push(snapshot::load_rule_database_of(path, source)?);
		}
	}

	let catalog = snapshot.catalog()?;
	let active = snapshot.active_identifiers();
	let rules = snapshot.rules;

	let report = tokio::task::spawn_blocking(move || {
		let mut builder = ResolverBuilder::new(&catalog)
			.active_identifiers(active)
			.rules(rules)
			.options(options);
		for db in &databases {
			builder = builder.rule_database(db);
		}
		builder.build().resolve()
	}).await?;

	print_report(&report);

	if report.is_ordered() {
		Ok(())
	} else {
		Err(Error::Unordered)
	}
}

fn print_report(report: &ResolveReport) {
	match &report.order {
		Ok(order) => {
			println!("Load order:");
			for (i, identifier) in order.iter().enumerate() {
				println!("{:>4} {}", i + 1, identifier);
			}
		},
		Err(e) => {
			println!("Unable to order packages: {}", e);
			for cycle in e.cycles() {
				println!("\tcycle: {}", cycle);
			}
		},
	}

	if !report.unresolved.is_empty() {
		println!("Missing dependencies:");
		for unresolved in &report.unresolved {
			let required_by = unresolved.required_by.iter().map(PackageId::as_str).collect::<Vec<_>>().join(", ");
			let note = if unresolved.in_catalog { "" } else { " (unknown package)" };
			println!("\t{}{} required by {}", unresolved.dependency, note, required_by);
		}
	}

	if !report.incompatibilities.is_empty() {
		println!("Incompatible packages:");
		for pair in &report.incompatibilities {
			println!("\t{} <-> {}", pair.first, pair.second);
		}
	}

	for diagnostic in &report.diagnostics {
		log::warn!("{}", diagnostic);
	}
}

/// `RELATION [TARGET]` starting at `free[i]` as a rule of `source`.
fn rule_from_args(parsed_options: &getopts::Matches, source: RuleSource, subject: &str, i: usize) -> Result<RuleEntry, Error> {
	let free = &parsed_options.free;
	let relation: Relation = free.get(i).ok_or(Error::MissingArgument("RELATION"))?.parse()?;
	let target = free.get(i + 1).map(|t| PackageId::new(t.as_str()));

	let mut entry = RuleEntry::new(source, subject, relation, target);
	if let Some(version) = game_version_option(parsed_options)? {
		entry = entry.for_game_version(version);
	}
	if let Some(comment) = parsed_options.opt_str("comment") {
		entry = entry.with_comment(comment);
	}
	Ok(entry)
}

fn add_rule(parsed_options: &getopts::Matches) -> Result<(), Error> {
	let free = &parsed_options.free;
	let path = free.get(2).ok_or(Error::MissingArgument("DB"))?;
	let source: RuleSource = free.get(3).ok_or(Error::MissingArgument("SOURCE"))?.parse()?;
	let subject = free.get(4).ok_or(Error::MissingArgument("SUBJECT"))?;

	let mut db = snapshot::load_or_create_rule_database(path, source)?;
	let entry = rule_from_args(parsed_options, source, subject, 5)?;
	log::debug!("Adding rule {}", entry);
	db.add(entry)?;
	snapshot::save_rule_database(path, &db)?;

	println!("Rule added, {} rules in database.", db.len());
	Ok(())
}

fn remove_rule(parsed_options: &getopts::Matches) -> Result<(), Error> {
	let free = &parsed_options.free;
	let path = free.get(2).ok_or(Error::MissingArgument("DB"))?;
	let subject = free.get(3).ok_or(Error::MissingArgument("SUBJECT"))?;

	let mut db = snapshot::load_rule_database(path)?;
	let entry = rule_from_args(parsed_options, db.source(), subject, 4)?;
	match db.remove(&entry) {
		Some(removed) => {
			snapshot::save_rule_database(path, &db)?;
			println!("Removed {}", removed);
			Ok(())
		},
		None => Err(Error::RuleNotFound(Box::new(entry))),
	}
}

fn list_rules(parsed_options: &getopts::Matches) -> Result<(), Error> {
	let free = &parsed_options.free;
	let path = free.get(2).ok_or(Error::MissingArgument("DB"))?;
	let db = snapshot::load_rule_database(path)?;

	let subject = free.get(3).map(|s| PackageId::new(s.as_str()));
	for rule in db.entries().iter().filter(|r| subject.as_ref().map_or(true, |s| &r.subject == s)) {
		match &rule.comment {
			Some(comment) => println!("{} # {}", rule, comment),
			None => println!("{}", rule),
		}
	}
	Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("modorder-rs error: {0}")]
	ModOrder(#[from] modorder_rs::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("Missing argument {0}")]
	MissingArgument(&'static str),
	#[error("Unknown command \"{0}\"")]
	UnknownCommand(String),
	#[error("Database holds {found} rules, expected {expected}")]
	SourceMismatch {
		expected: RuleSource,
		found: RuleSource,
	},
	#[error("No matching rule: {0}")]
	RuleNotFound(Box<RuleEntry>),
	#[error("Resolver task failed: {0}")]
	Join(#[from] tokio::task::JoinError),
	#[error("Load order could not be produced")]
	Unordered,
}
