//! In-memory entity store and the storage backends it is loaded from.

pub mod files;
pub mod db;

use log::{info, warn};

use crate::data::{
	Delivery, Dismissal, Match, MatchResult, MatchTeams, Named, Player, PlayerOfMatch, Table, Team,
	Toss, Umpire, UmpireMatch, Venue,
};
use crate::error::{EntityKind, QueryError, Result};
use crate::resolve;

#[derive(Debug, Clone, Default)]
pub struct Tables {
	pub teams: Vec<Team>,
	pub players: Vec<Player>,
	pub venues: Vec<Venue>,
	pub umpires: Vec<Umpire>,
	pub matches: Vec<Match>,
	pub match_teams: Vec<MatchTeams>,
	pub results: Vec<MatchResult>,
	pub tosses: Vec<Toss>,
	pub deliveries: Vec<Delivery>,
	pub dismissals: Vec<Dismissal>,
	pub player_of_match: Vec<PlayerOfMatch>,
	pub umpire_matches: Vec<UmpireMatch>,
}

impl Tables {
	pub fn log_summary(&self) {
		info!(
			"Loaded {} teams, {} players, {} venues, {} umpires",
			self.teams.len(),
			self.players.len(),
			self.venues.len(),
			self.umpires.len()
		);
		info!(
			"Loaded {} matches, {} deliveries, {} dismissals",
			self.matches.len(),
			self.deliveries.len(),
			self.dismissals.len()
		);
	}
}

/// A full table snapshot handed to a backend for writing.
#[derive(Debug, Clone, Copy)]
pub enum Persisted<'a> {
	Teams(&'a [Team]),
	Venues(&'a [Venue]),
}

impl Persisted<'_> {
	pub fn table_name(&self) -> &'static str {
		match self {
			Persisted::Teams(_) => Team::NAME,
			Persisted::Venues(_) => Venue::NAME,
		}
	}
}

pub trait Storage {
	fn load(&self) -> Result<Tables>;
	fn persist(&mut self, rows: Persisted<'_>) -> Result<()>;
}

/// The loaded tables plus the backend that rename operations write through to.
pub struct Workspace {
	tables: Tables,
	storage: Box<dyn Storage>,
}

impl Workspace {
	pub fn open(storage: Box<dyn Storage>) -> Result<Self> {
		let tables = storage.load()?;
		tables.log_summary();

		Ok(Self { tables, storage })
	}

	pub fn tables(&self) -> &Tables {
		&self.tables
	}

	pub fn rename_team(&mut self, old_name: &str, new_name: &str) -> std::result::Result<Team, QueryError> {
		let teams = renamed(&self.tables.teams, EntityKind::Team, old_name, new_name)?;
		self.storage
			.persist(Persisted::Teams(&teams.rows))
			.map_err(|e| QueryError::Storage(e.to_string()))?;

		let team = teams.rows[teams.index].clone();
		self.tables.teams = teams.rows;
		info!("Renamed team {} from '{}' to '{}'", team.id, old_name.trim(), team.name);

		Ok(team)
	}

	pub fn rename_venue(&mut self, old_name: &str, new_name: &str) -> std::result::Result<Venue, QueryError> {
		let venues = renamed(&self.tables.venues, EntityKind::Venue, old_name, new_name)?;
		self.storage
			.persist(Persisted::Venues(&venues.rows))
			.map_err(|e| QueryError::Storage(e.to_string()))?;

		let venue = venues.rows[venues.index].clone();
		self.tables.venues = venues.rows;
		info!("Renamed venue {} from '{}' to '{}'", venue.id, old_name.trim(), venue.name);

		Ok(venue)
	}
}

struct Renamed<T> {
	rows: Vec<T>,
	index: usize,
}

// Builds the replacement snapshot; the live table is only swapped once it has been persisted.
fn renamed<T: Named + Clone>(
	rows: &[T],
	kind: EntityKind,
	old_name: &str,
	new_name: &str,
) -> std::result::Result<Renamed<T>, QueryError> {
	let (old_name, new_name) = (old_name.trim(), new_name.trim());
	if old_name.is_empty() || new_name.is_empty() {
		warn!("Rejected {kind} rename with an empty name");
		return Err(QueryError::Validation(format!(
			"{kind} names cannot be empty."
		)));
	}

	let index = resolve::exact_position(rows, old_name).ok_or_else(|| QueryError::not_found(kind, old_name))?;

	let mut rows = rows.to_vec();
	rows[index].set_name(new_name.to_string());

	Ok(Renamed { rows, index })
}
