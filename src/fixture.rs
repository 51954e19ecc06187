//! Small two-team league shared by the unit tests.
//!
//! Mumbai (1) and Chennai (2) meet three times: a 2019 league game and final,
//! and the 2020 final. Mumbai wins matches 1 and 3 and two tosses.

use std::cell::RefCell;
use std::rc::Rc;

use crate::data::*;
use crate::error::{Error, Result};
use crate::store::{Persisted, Storage, Tables};

fn named<T>(rows: &[(i64, &str)], build: impl Fn(i64, String) -> T) -> Vec<T> {
	rows.iter().map(|&(id, name)| build(id, name.to_string())).collect()
}

fn game(match_id: i64, season: &str, date: &str, venue_id: i64, match_type: &str) -> Match {
	Match {
		match_id,
		season: season.into(),
		date: date.into(),
		venue_id: Some(venue_id),
		match_type: match_type.into(),
	}
}

fn toss(match_id: i64, winner: i64, decision: &str) -> Toss {
	Toss {
		match_id,
		team_id: Some(winner),
		toss_winner: Some(winner),
		toss_decision: decision.into(),
	}
}

/// `(match, inning, over, ball, batter, non_striker, bowler, batting, bowling, bat_runs, total)`
type Ball = (i64, i64, i64, i64, i64, i64, i64, i64, i64, i64, i64);

pub fn delivery(b: Ball) -> Delivery {
	Delivery {
		match_id: b.0,
		inning: b.1,
		over: b.2,
		ball: b.3,
		batter_id: b.4,
		non_striker_id: b.5,
		bowler_id: b.6,
		batting_team_id: b.7,
		bowling_team_id: b.8,
		batsman_runs: b.9,
		total_runs: b.10,
	}
}

pub fn dismissal(match_id: i64, inning: i64, over: i64, ball: i64, kind: &str, fielder: Option<i64>) -> Dismissal {
	Dismissal {
		match_id,
		inning,
		over,
		ball,
		dismissal_kind: kind.into(),
		fielder_id: fielder,
	}
}

pub fn tables() -> Tables {
	let balls: &[Ball] = &[
		// match 1, Mumbai bat first
		(1, 1, 0, 1, 7, 8, 10, 1, 2, 4, 4),
		(1, 1, 0, 2, 7, 8, 10, 1, 2, 6, 6),
		(1, 1, 0, 3, 7, 8, 10, 1, 2, 0, 0),
		(1, 1, 1, 1, 8, 7, 10, 1, 2, 1, 1),
		(1, 1, 6, 1, 7, 8, 10, 1, 2, 0, 0),
		(1, 2, 0, 1, 10, 11, 9, 2, 1, 1, 1),
		(1, 2, 0, 2, 11, 10, 9, 2, 1, 0, 0),
		(1, 2, 0, 3, 10, 11, 9, 2, 1, 2, 3),
		// match 2, the 2019 final
		(2, 1, 0, 1, 11, 10, 9, 2, 1, 6, 6),
		(2, 1, 0, 2, 11, 10, 9, 2, 1, 4, 4),
		(2, 2, 0, 1, 7, 8, 10, 1, 2, 1, 1),
		(2, 2, 0, 2, 8, 7, 10, 1, 2, 0, 0),
		// match 3, the 2020 final
		(3, 1, 0, 1, 7, 8, 10, 1, 2, 100, 100),
	];

	Tables {
		teams: named(&[(1, "Mumbai"), (2, "Chennai")], |id, name| Team { id, name }),
		players: named(
			&[(7, "V Kohli"), (8, "R Sharma"), (9, "J Bumrah"), (10, "R Jadeja"), (11, "M Dhoni")],
			|id, name| Player { id, name },
		),
		venues: named(&[(1, "Wankhede Stadium"), (2, "Chepauk")], |id, name| Venue { id, name }),
		umpires: named(&[(1, "S Ravi"), (2, "A Dar"), (3, "N Menon")], |id, name| Umpire { id, name }),
		matches: vec![
			game(1, "2019", "2019-04-01", 1, "League"),
			game(2, "2019", "2019-05-12", 2, "Final"),
			game(3, "2020", "2020-11-10", 1, "Final"),
		],
		match_teams: vec![
			MatchTeams { match_id: 1, team_id1: 1, team_id2: 2 },
			MatchTeams { match_id: 2, team_id1: 2, team_id2: 1 },
			MatchTeams { match_id: 3, team_id1: 1, team_id2: 2 },
		],
		results: vec![
			MatchResult { match_id: 1, winner_id: Some(1) },
			MatchResult { match_id: 2, winner_id: Some(2) },
			MatchResult { match_id: 3, winner_id: Some(1) },
		],
		tosses: vec![toss(1, 1, "bat"), toss(2, 1, "field"), toss(3, 2, "bat")],
		deliveries: balls.iter().copied().map(delivery).collect(),
		dismissals: vec![
			dismissal(1, 1, 6, 1, "caught", Some(10)),
			dismissal(1, 2, 0, 2, "bowled", None),
			dismissal(2, 2, 0, 2, "caught", Some(11)),
		],
		player_of_match: vec![
			PlayerOfMatch { match_id: 1, player_of_the_match_id: Some(7) },
			PlayerOfMatch { match_id: 2, player_of_the_match_id: Some(10) },
			PlayerOfMatch { match_id: 3, player_of_the_match_id: Some(7) },
		],
		umpire_matches: vec![
			UmpireMatch { match_id: 1, umpire_id1: Some(1), umpire_id2: Some(2) },
			UmpireMatch { match_id: 2, umpire_id1: Some(2), umpire_id2: Some(1) },
			UmpireMatch { match_id: 3, umpire_id1: Some(1), umpire_id2: Some(3) },
		],
	}
}

/// Storage double that keeps persisted snapshots in memory.
pub struct MemoryStorage {
	tables: Tables,
	saved: Rc<RefCell<Tables>>,
	pub fail_persist: bool,
}

impl MemoryStorage {
	pub fn new(tables: Tables) -> Self {
		Self {
			saved: Rc::new(RefCell::new(tables.clone())),
			tables,
			fail_persist: false,
		}
	}

	pub fn saved(&self) -> Rc<RefCell<Tables>> {
		Rc::clone(&self.saved)
	}
}

impl Storage for MemoryStorage {
	fn load(&self) -> Result<Tables> {
		Ok(self.tables.clone())
	}

	fn persist(&mut self, rows: Persisted<'_>) -> Result<()> {
		if self.fail_persist {
			return Err(Error::Io(std::io::Error::new(
				std::io::ErrorKind::PermissionDenied,
				format!("{} is read-only", rows.table_name()),
			)));
		}

		let mut saved = self.saved.borrow_mut();
		match rows {
			Persisted::Teams(teams) => saved.teams = teams.to_vec(),
			Persisted::Venues(venues) => saved.venues = venues.to_vec(),
		}

		Ok(())
	}
}
