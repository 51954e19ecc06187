use std::path::Path;

use log::{debug, info};
use rusqlite::{params, Connection, Row, Transaction};

use crate::data::{
	Delivery, Dismissal, Match, MatchResult, MatchTeams, Player, PlayerOfMatch, Team, Toss, Umpire,
	UmpireMatch, Venue,
};
use crate::error::Result;
use crate::store::{Persisted, Storage, Tables};

pub fn create_schema(conn: &mut Connection) -> rusqlite::Result<()> {
	let tx = conn.transaction()?;

	tx.execute_batch(
		r#"
		CREATE TABLE IF NOT EXISTS teams (
			team_id INTEGER NOT NULL,
			team    TEXT    NOT NULL
		);
		CREATE TABLE IF NOT EXISTS players (
			player_id INTEGER NOT NULL,
			player    TEXT    NOT NULL
		);
		CREATE TABLE IF NOT EXISTS venue (
			venue_id INTEGER NOT NULL,
			venue    TEXT    NOT NULL
		);
		CREATE TABLE IF NOT EXISTS umpire (
			umpire_id INTEGER NOT NULL,
			umpire    TEXT    NOT NULL
		);
		CREATE TABLE IF NOT EXISTS "match" (
			match_id   INTEGER NOT NULL,
			season     TEXT    NOT NULL,
			date       TEXT    NOT NULL,
			venue_id   INTEGER,
			match_type TEXT    NOT NULL
		);
		CREATE TABLE IF NOT EXISTS match_teams (
			match_id INTEGER NOT NULL,
			team_id1 INTEGER NOT NULL,
			team_id2 INTEGER NOT NULL
		);
		CREATE TABLE IF NOT EXISTS match_result (
			match_id  INTEGER NOT NULL,
			winner_id INTEGER
		);
		CREATE TABLE IF NOT EXISTS toss (
			match_id      INTEGER NOT NULL,
			team_id       INTEGER,
			toss_winner   INTEGER,
			toss_decision TEXT    NOT NULL
		);
		CREATE TABLE IF NOT EXISTS delivery (
			match_id        INTEGER NOT NULL,
			inning          INTEGER NOT NULL,
			"over"          INTEGER NOT NULL,
			ball            INTEGER NOT NULL,
			batter_id       INTEGER NOT NULL,
			bowler_id       INTEGER NOT NULL,
			non_striker_id  INTEGER NOT NULL,
			batting_team_id INTEGER NOT NULL,
			bowling_team_id INTEGER NOT NULL,
			batsman_runs    INTEGER NOT NULL,
			total_runs      INTEGER NOT NULL
		);
		CREATE TABLE IF NOT EXISTS dismissals (
			match_id       INTEGER NOT NULL,
			inning         INTEGER NOT NULL,
			"over"         INTEGER NOT NULL,
			ball           INTEGER NOT NULL,
			dismissal_kind TEXT    NOT NULL,
			fielder_id     INTEGER
		);
		CREATE TABLE IF NOT EXISTS player_of_the_match (
			match_id               INTEGER NOT NULL,
			player_of_the_match_id INTEGER
		);
		CREATE TABLE IF NOT EXISTS umpire_match (
			match_id   INTEGER NOT NULL,
			umpire_id1 INTEGER,
			umpire_id2 INTEGER
		);
		"#,
	)?;

	tx.commit()
}

/// The same twelve tables kept in a single SQLite file.
pub struct SqliteStorage {
	conn: Connection,
}

impl SqliteStorage {
	pub fn open(path: &Path) -> Result<Self> {
		Self::with_connection(Connection::open(path)?)
	}

	pub fn with_connection(mut conn: Connection) -> Result<Self> {
		create_schema(&mut conn)?;
		Ok(Self { conn })
	}

	/// Replaces the contents of every table with `tables`.
	pub fn import(&mut self, tables: &Tables) -> Result<()> {
		let tx = self.conn.transaction()?;

		write_teams(&tx, &tables.teams)?;
		write_venues(&tx, &tables.venues)?;

		clear(&tx, "players")?;
		for p in &tables.players {
			tx.execute("INSERT INTO players (player_id, player) VALUES (?1, ?2);", params![p.id, p.name])?;
		}

		clear(&tx, "umpire")?;
		for u in &tables.umpires {
			tx.execute("INSERT INTO umpire (umpire_id, umpire) VALUES (?1, ?2);", params![u.id, u.name])?;
		}

		clear(&tx, "\"match\"")?;
		for m in &tables.matches {
			tx.execute(
				"INSERT INTO \"match\" (match_id, season, date, venue_id, match_type)
				 VALUES (?1, ?2, ?3, ?4, ?5);",
				params![m.match_id, m.season, m.date, m.venue_id, m.match_type],
			)?;
		}

		clear(&tx, "match_teams")?;
		for mt in &tables.match_teams {
			tx.execute(
				"INSERT INTO match_teams (match_id, team_id1, team_id2) VALUES (?1, ?2, ?3);",
				params![mt.match_id, mt.team_id1, mt.team_id2],
			)?;
		}

		clear(&tx, "match_result")?;
		for r in &tables.results {
			tx.execute(
				"INSERT INTO match_result (match_id, winner_id) VALUES (?1, ?2);",
				params![r.match_id, r.winner_id],
			)?;
		}

		clear(&tx, "toss")?;
		for t in &tables.tosses {
			tx.execute(
				"INSERT INTO toss (match_id, team_id, toss_winner, toss_decision) VALUES (?1, ?2, ?3, ?4);",
				params![t.match_id, t.team_id, t.toss_winner, t.toss_decision],
			)?;
		}

		clear(&tx, "delivery")?;
		{
			let mut stmt = tx.prepare(
				"INSERT INTO delivery (match_id, inning, \"over\", ball, batter_id, bowler_id, non_striker_id,
				                       batting_team_id, bowling_team_id, batsman_runs, total_runs)
				 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11);",
			)?;
			for d in &tables.deliveries {
				stmt.execute(params![
					d.match_id,
					d.inning,
					d.over,
					d.ball,
					d.batter_id,
					d.bowler_id,
					d.non_striker_id,
					d.batting_team_id,
					d.bowling_team_id,
					d.batsman_runs,
					d.total_runs
				])?;
			}
		}

		clear(&tx, "dismissals")?;
		for d in &tables.dismissals {
			tx.execute(
				"INSERT INTO dismissals (match_id, inning, \"over\", ball, dismissal_kind, fielder_id)
				 VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
				params![d.match_id, d.inning, d.over, d.ball, d.dismissal_kind, d.fielder_id],
			)?;
		}

		clear(&tx, "player_of_the_match")?;
		for p in &tables.player_of_match {
			tx.execute(
				"INSERT INTO player_of_the_match (match_id, player_of_the_match_id) VALUES (?1, ?2);",
				params![p.match_id, p.player_of_the_match_id],
			)?;
		}

		clear(&tx, "umpire_match")?;
		for u in &tables.umpire_matches {
			tx.execute(
				"INSERT INTO umpire_match (match_id, umpire_id1, umpire_id2) VALUES (?1, ?2, ?3);",
				params![u.match_id, u.umpire_id1, u.umpire_id2],
			)?;
		}

		tx.commit()?;
		info!("Imported {} matches and {} deliveries", tables.matches.len(), tables.deliveries.len());

		Ok(())
	}

	fn select<T>(&self, sql: &str, map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>) -> Result<Vec<T>> {
		let mut stmt = self.conn.prepare(sql)?;
		let rows = stmt.query_map([], map)?.collect::<rusqlite::Result<Vec<T>>>()?;
		debug!("{} rows from `{}`", rows.len(), sql);

		Ok(rows)
	}
}

fn clear(tx: &Transaction<'_>, table: &str) -> rusqlite::Result<()> {
	tx.execute(&format!("DELETE FROM {table};"), [])?;
	Ok(())
}

fn write_teams(tx: &Transaction<'_>, teams: &[Team]) -> rusqlite::Result<()> {
	clear(tx, "teams")?;
	for t in teams {
		tx.execute("INSERT INTO teams (team_id, team) VALUES (?1, ?2);", params![t.id, t.name])?;
	}
	Ok(())
}

fn write_venues(tx: &Transaction<'_>, venues: &[Venue]) -> rusqlite::Result<()> {
	clear(tx, "venue")?;
	for v in venues {
		tx.execute("INSERT INTO venue (venue_id, venue) VALUES (?1, ?2);", params![v.id, v.name])?;
	}
	Ok(())
}

impl Storage for SqliteStorage {
	fn load(&self) -> Result<Tables> {
		Ok(Tables {
			teams: self.select("SELECT team_id, team FROM teams ORDER BY rowid;", |row| {
				Ok(Team { id: row.get(0)?, name: row.get(1)? })
			})?,
			players: self.select("SELECT player_id, player FROM players ORDER BY rowid;", |row| {
				Ok(Player { id: row.get(0)?, name: row.get(1)? })
			})?,
			venues: self.select("SELECT venue_id, venue FROM venue ORDER BY rowid;", |row| {
				Ok(Venue { id: row.get(0)?, name: row.get(1)? })
			})?,
			umpires: self.select("SELECT umpire_id, umpire FROM umpire ORDER BY rowid;", |row| {
				Ok(Umpire { id: row.get(0)?, name: row.get(1)? })
			})?,
			matches: self.select(
				"SELECT match_id, season, date, venue_id, match_type FROM \"match\" ORDER BY rowid;",
				|row| {
					Ok(Match {
						match_id: row.get(0)?,
						season: row.get(1)?,
						date: row.get(2)?,
						venue_id: row.get(3)?,
						match_type: row.get(4)?,
					})
				},
			)?,
			match_teams: self.select(
				"SELECT match_id, team_id1, team_id2 FROM match_teams ORDER BY rowid;",
				|row| {
					Ok(MatchTeams {
						match_id: row.get(0)?,
						team_id1: row.get(1)?,
						team_id2: row.get(2)?,
					})
				},
			)?,
			results: self.select("SELECT match_id, winner_id FROM match_result ORDER BY rowid;", |row| {
				Ok(MatchResult { match_id: row.get(0)?, winner_id: row.get(1)? })
			})?,
			tosses: self.select(
				"SELECT match_id, team_id, toss_winner, toss_decision FROM toss ORDER BY rowid;",
				|row| {
					Ok(Toss {
						match_id: row.get(0)?,
						team_id: row.get(1)?,
						toss_winner: row.get(2)?,
						toss_decision: row.get(3)?,
					})
				},
			)?,
			deliveries: self.select(
				"SELECT match_id, inning, \"over\", ball, batter_id, bowler_id, non_striker_id,
				        batting_team_id, bowling_team_id, batsman_runs, total_runs
				 FROM delivery ORDER BY rowid;",
				|row| {
					Ok(Delivery {
						match_id: row.get(0)?,
						inning: row.get(1)?,
						over: row.get(2)?,
						ball: row.get(3)?,
						batter_id: row.get(4)?,
						bowler_id: row.get(5)?,
						non_striker_id: row.get(6)?,
						batting_team_id: row.get(7)?,
						bowling_team_id: row.get(8)?,
						batsman_runs: row.get(9)?,
						total_runs: row.get(10)?,
					})
				},
			)?,
			dismissals: self.select(
				"SELECT match_id, inning, \"over\", ball, dismissal_kind, fielder_id FROM dismissals ORDER BY rowid;",
				|row| {
					Ok(Dismissal {
						match_id: row.get(0)?,
						inning: row.get(1)?,
						over: row.get(2)?,
						ball: row.get(3)?,
						dismissal_kind: row.get(4)?,
						fielder_id: row.get(5)?,
					})
				},
			)?,
			player_of_match: self.select(
				"SELECT match_id, player_of_the_match_id FROM player_of_the_match ORDER BY rowid;",
				|row| {
					Ok(PlayerOfMatch {
						match_id: row.get(0)?,
						player_of_the_match_id: row.get(1)?,
					})
				},
			)?,
			umpire_matches: self.select(
				"SELECT match_id, umpire_id1, umpire_id2 FROM umpire_match ORDER BY rowid;",
				|row| {
					Ok(UmpireMatch {
						match_id: row.get(0)?,
						umpire_id1: row.get(1)?,
						umpire_id2: row.get(2)?,
					})
				},
			)?,
		})
	}

	fn persist(&mut self, rows: Persisted<'_>) -> Result<()> {
		let tx = self.conn.transaction()?;
		match rows {
			Persisted::Teams(teams) => write_teams(&tx, teams)?,
			Persisted::Venues(venues) => write_venues(&tx, venues)?,
		}
		tx.commit()?;
		debug!("Persisted table {}", rows.table_name());

		Ok(())
	}
}
