use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::data::{
	Delivery, Dismissal, Match, MatchResult, MatchTeams, Named, Player, PlayerOfMatch, Table, Team,
	Toss, Umpire, UmpireMatch, Venue,
};
use crate::error::{Error, Result};
use crate::store::{Persisted, Storage, Tables};

/// A directory of normalized CSV files, one per table.
pub struct CsvStorage {
	dir: PathBuf,
}

impl CsvStorage {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	fn path_of(&self, table: &str) -> PathBuf {
		self.dir.join(format!("{table}.csv"))
	}

	fn read<T: Table + DeserializeOwned>(&self) -> Result<Vec<T>> {
		let path = self.path_of(T::NAME);
		let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(&path)?;
		check_columns::<T>(reader.headers()?)?;

		let rows = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
		debug!("Read {} rows from {}", rows.len(), path.display());

		Ok(rows)
	}

	fn write<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<()> {
		let path = self.path_of(table);
		let staging = path.with_extension("csv.tmp");

		let mut writer = Writer::from_path(&staging)?;
		for row in rows {
			writer.serialize(row)?;
		}
		writer.flush()?;
		drop(writer);

		fs::rename(&staging, &path)?;
		debug!("Wrote {} rows to {}", rows.len(), path.display());

		Ok(())
	}

	/// Rewrites the name cells of an existing table file in place. The header order and any
	/// extra columns are kept as read; only the cell of a row whose name changed is replaced.
	fn rewrite_names<T: Table + Named + Serialize>(&self, rows: &[T]) -> Result<()> {
		let path = self.path_of(T::NAME);
		if !path.exists() {
			return self.write(T::NAME, rows);
		}

		let mut reader = ReaderBuilder::new().from_path(&path)?;
		let headers = reader.headers()?.clone();
		let position = |column: &'static str| {
			headers
				.iter()
				.position(|h| h.trim() == column)
				.ok_or(Error::Schema { table: T::NAME, column })
		};
		let (id_at, name_at) = (position(T::COLUMNS[0])?, position(T::COLUMNS[1])?);

		let names: HashMap<i64, &str> = rows.iter().map(|r| (r.id(), r.name())).collect();
		let staging = path.with_extension("csv.tmp");
		let mut writer = Writer::from_path(&staging)?;
		writer.write_record(&headers)?;

		let mut changed = 0;
		for record in reader.records() {
			let record = record?;
			let renamed = record
				.get(id_at)
				.and_then(parse_id)
				.and_then(|id| names.get(&id))
				.filter(|name| record.get(name_at).map(str::trim) != Some(**name));

			match renamed {
				Some(name) => {
					changed += 1;
					let cells: StringRecord = record
						.iter()
						.enumerate()
						.map(|(i, cell)| if i == name_at { *name } else { cell })
						.collect();
					writer.write_record(&cells)?;
				}
				None => writer.write_record(&record)?,
			}
		}
		writer.flush()?;
		drop(writer);

		fs::rename(&staging, &path)?;
		debug!("Rewrote {changed} name cells in {}", path.display());

		Ok(())
	}

	/// Writes every table, creating the directory if needed.
	pub fn write_all(&self, tables: &Tables) -> Result<()> {
		fs::create_dir_all(&self.dir)?;

		self.write(Team::NAME, &tables.teams)?;
		self.write(Player::NAME, &tables.players)?;
		self.write(Venue::NAME, &tables.venues)?;
		self.write(Umpire::NAME, &tables.umpires)?;
		self.write(Match::NAME, &tables.matches)?;
		self.write(MatchTeams::NAME, &tables.match_teams)?;
		self.write(MatchResult::NAME, &tables.results)?;
		self.write(Toss::NAME, &tables.tosses)?;
		self.write(Delivery::NAME, &tables.deliveries)?;
		self.write(Dismissal::NAME, &tables.dismissals)?;
		self.write(PlayerOfMatch::NAME, &tables.player_of_match)?;
		self.write(UmpireMatch::NAME, &tables.umpire_matches)
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}
}

fn parse_id(cell: &str) -> Option<i64> {
	let cell = cell.trim();
	cell.parse::<i64>()
		.ok()
		.or_else(|| cell.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

pub fn check_columns<T: Table>(headers: &StringRecord) -> Result<()> {
	for &column in T::COLUMNS {
		if !headers.iter().any(|h| h == column) {
			return Err(Error::Schema {
				table: T::NAME,
				column,
			});
		}
	}

	Ok(())
}

impl Storage for CsvStorage {
	fn load(&self) -> Result<Tables> {
		debug!("Loading tables from {}", self.dir.display());

		Ok(Tables {
			teams: self.read()?,
			players: self.read()?,
			venues: self.read()?,
			umpires: self.read()?,
			matches: self.read()?,
			match_teams: self.read()?,
			results: self.read()?,
			tosses: self.read()?,
			deliveries: self.read()?,
			dismissals: self.read()?,
			player_of_match: self.read()?,
			umpire_matches: self.read()?,
		})
	}

	fn persist(&mut self, rows: Persisted<'_>) -> Result<()> {
		match rows {
			Persisted::Teams(teams) => self.rewrite_names(teams),
			Persisted::Venues(venues) => self.rewrite_names(venues),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixture;

	#[test]
	fn tables_survive_a_write_and_load() {
		let dir = tempfile::tempdir().unwrap();
		let storage = CsvStorage::new(dir.path());
		storage.write_all(&fixture::tables()).unwrap();

		let loaded = storage.load().unwrap();
		let expected = fixture::tables();
		assert_eq!(loaded.teams, expected.teams);
		assert_eq!(loaded.deliveries, expected.deliveries);
		assert_eq!(loaded.dismissals, expected.dismissals);
		assert_eq!(loaded.tosses, expected.tosses);
	}

	#[test]
	fn missing_column_is_a_schema_error() {
		let dir = tempfile::tempdir().unwrap();
		let storage = CsvStorage::new(dir.path());
		storage.write_all(&fixture::tables()).unwrap();
		fs::write(dir.path().join("teams.csv"), "team_id,label\n1,Mumbai\n").unwrap();

		match storage.load() {
			Err(Error::Schema { table, column }) => {
				assert_eq!(table, "teams");
				assert_eq!(column, "team");
			}
			other => panic!("expected schema error, got {other:?}"),
		}
	}

	#[test]
	fn nullable_ids_accept_blank_and_float_cells() {
		let dir = tempfile::tempdir().unwrap();
		let storage = CsvStorage::new(dir.path());
		storage.write_all(&fixture::tables()).unwrap();
		fs::write(
			dir.path().join("match_result.csv"),
			"match_id,winner_id\n1,1.0\n2,\n3,abandoned\n",
		)
		.unwrap();

		let results = storage.load().unwrap().results;
		let winners: Vec<_> = results.iter().map(|r| r.winner_id).collect();
		assert_eq!(winners, vec![Some(1), None, None]);
	}

	#[test]
	fn persist_rewrites_only_the_named_table() {
		let dir = tempfile::tempdir().unwrap();
		let mut storage = CsvStorage::new(dir.path());
		storage.write_all(&fixture::tables()).unwrap();
		let before = fs::read_to_string(dir.path().join("match_teams.csv")).unwrap();

		let mut teams = fixture::tables().teams;
		teams[1].name = "Chennai Super Kings".into();
		storage.persist(Persisted::Teams(&teams)).unwrap();

		let loaded = storage.load().unwrap();
		assert_eq!(loaded.teams[1], Team { id: 2, name: "Chennai Super Kings".into() });
		assert_eq!(fs::read_to_string(dir.path().join("match_teams.csv")).unwrap(), before);
		assert!(fs::read_to_string(dir.path().join("teams.csv")).unwrap().starts_with("team_id,team\n"));
	}

	#[test]
	fn persist_keeps_column_order_and_extra_columns() {
		let dir = tempfile::tempdir().unwrap();
		let mut storage = CsvStorage::new(dir.path());
		storage.write_all(&fixture::tables()).unwrap();
		fs::write(dir.path().join("teams.csv"), "team,team_id,short\nMumbai,1,MI\nChennai,2,CSK\n").unwrap();

		let mut teams = storage.load().unwrap().teams;
		teams[0].name = "Mumbai Indians".into();
		storage.persist(Persisted::Teams(&teams)).unwrap();

		assert_eq!(
			fs::read_to_string(dir.path().join("teams.csv")).unwrap(),
			"team,team_id,short\nMumbai Indians,1,MI\nChennai,2,CSK\n"
		);
		assert_eq!(storage.load().unwrap().teams, teams);
	}
}
