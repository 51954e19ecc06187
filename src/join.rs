//! Key joins over the loaded tables.
//!
//! The right-hand side of every join is indexed by its key with the first row
//! per key winning. Left joins never drop a left row: a missing partner is `None`.

use std::collections::HashMap;
use std::hash::Hash;

use crate::data::{Delivery, Dismissal, Match, MatchTeams, Named};
use crate::store::Tables;

pub fn index_by<K, T>(rows: &[T], key: impl Fn(&T) -> K) -> HashMap<K, &T>
where
	K: Eq + Hash,
{
	let mut index = HashMap::with_capacity(rows.len());
	for row in rows {
		index.entry(key(row)).or_insert(row);
	}
	index
}

pub fn left_join<'a, L, R, K>(
	left: &'a [L],
	right: &'a [R],
	left_key: impl Fn(&L) -> K,
	right_key: impl Fn(&R) -> K,
) -> Vec<(&'a L, Option<&'a R>)>
where
	K: Eq + Hash,
{
	let index = index_by(right, right_key);
	left.iter().map(|l| (l, index.get(&left_key(l)).copied())).collect()
}

pub fn inner_join<'a, L, R, K>(
	left: &'a [L],
	right: &'a [R],
	left_key: impl Fn(&L) -> K,
	right_key: impl Fn(&R) -> K,
) -> Vec<(&'a L, &'a R)>
where
	K: Eq + Hash,
{
	left_join(left, right, left_key, right_key)
		.into_iter()
		.filter_map(|(l, r)| r.map(|r| (l, r)))
		.collect()
}

/// Matches by id, for the season and match-type lookups most pipelines start from.
pub struct MatchIndex<'a> {
	by_id: HashMap<i64, &'a Match>,
}

impl<'a> MatchIndex<'a> {
	pub fn new(matches: &'a [Match]) -> Self {
		Self {
			by_id: index_by(matches, |m| m.match_id),
		}
	}

	pub fn get(&self, match_id: i64) -> Option<&'a Match> {
		self.by_id.get(&match_id).copied()
	}

	pub fn season(&self, match_id: i64) -> Option<&'a str> {
		self.get(match_id).and_then(Match::season)
	}
}

/// One delivery with its season and, when a wicket fell on it, the dismissal.
#[derive(Debug, Clone, Copy)]
pub struct Ball<'a> {
	pub delivery: &'a Delivery,
	pub season: Option<&'a str>,
	pub dismissal: Option<&'a Dismissal>,
}

impl Ball<'_> {
	pub fn is_wicket(&self) -> bool {
		self.dismissal.is_some()
	}

	pub fn is_dot(&self) -> bool {
		self.delivery.total_runs == 0
	}
}

/// Every delivery, left-joined to its match and flagged against the dismissals on the ball key.
pub fn balls(tables: &Tables) -> Vec<Ball<'_>> {
	let matches = MatchIndex::new(&tables.matches);

	left_join(&tables.deliveries, &tables.dismissals, Delivery::key, Dismissal::key)
		.into_iter()
		.map(|(delivery, dismissal)| Ball {
			delivery,
			season: matches.season(delivery.match_id),
			dismissal,
		})
		.collect()
}

/// A dismissal with the ball it fell on, if that ball is in the delivery table.
#[derive(Debug, Clone, Copy)]
pub struct Wicket<'a> {
	pub dismissal: &'a Dismissal,
	pub delivery: Option<&'a Delivery>,
	pub season: Option<&'a str>,
}

impl Wicket<'_> {
	pub fn bowler(&self) -> Option<i64> {
		self.delivery.map(|d| d.bowler_id)
	}
}

pub fn wickets(tables: &Tables) -> Vec<Wicket<'_>> {
	let matches = MatchIndex::new(&tables.matches);

	left_join(&tables.dismissals, &tables.deliveries, Dismissal::key, Delivery::key)
		.into_iter()
		.map(|(dismissal, delivery)| Wicket {
			dismissal,
			delivery,
			season: matches.season(dismissal.match_id),
		})
		.collect()
}

/// Identifier to display name for one of the named tables.
pub struct Names<'a> {
	by_id: HashMap<i64, &'a str>,
}

impl<'a> Names<'a> {
	pub fn of<T: Named>(rows: &'a [T]) -> Self {
		let mut by_id = HashMap::with_capacity(rows.len());
		for row in rows {
			by_id.entry(row.id()).or_insert(row.name());
		}
		Self { by_id }
	}

	pub fn get(&self, id: i64) -> Option<&'a str> {
		self.by_id.get(&id).copied()
	}

	pub fn get_opt(&self, id: Option<i64>) -> Option<&'a str> {
		id.and_then(|id| self.get(id))
	}

	/// The name, or `id:<n>` when the row is missing.
	pub fn label(&self, id: i64) -> String {
		self.get(id).map_or_else(|| format!("id:{id}"), str::to_string)
	}

	/// Resolves two foreign keys against the same table into separately named columns.
	pub fn pair(&self, first: Option<i64>, second: Option<i64>) -> Aliased<'a> {
		Aliased {
			first: self.get_opt(first),
			second: self.get_opt(second),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aliased<'a> {
	pub first: Option<&'a str>,
	pub second: Option<&'a str>,
}

/// A match with every foreign key resolved to a name.
#[derive(Debug, Clone)]
pub struct MatchSheet<'a> {
	pub game: &'a Match,
	pub venue: Option<&'a str>,
	pub teams: Aliased<'a>,
	pub umpires: Aliased<'a>,
	pub winner: Option<&'a str>,
	pub player_of_match: Option<&'a str>,
}

pub fn match_sheets(tables: &Tables) -> Vec<MatchSheet<'_>> {
	let venues = Names::of(&tables.venues);
	let teams = Names::of(&tables.teams);
	let umpires = Names::of(&tables.umpires);
	let players = Names::of(&tables.players);

	let sides = index_by(&tables.match_teams, |mt| mt.match_id);
	let officials = index_by(&tables.umpire_matches, |um| um.match_id);
	let results = index_by(&tables.results, |r| r.match_id);
	let awards = index_by(&tables.player_of_match, |p| p.match_id);

	tables
		.matches
		.iter()
		.map(|game| {
			let side = sides.get(&game.match_id).copied();
			let official = officials.get(&game.match_id).copied();

			MatchSheet {
				game,
				venue: venues.get_opt(game.venue_id),
				teams: teams.pair(side.map(|s| s.team_id1), side.map(|s| s.team_id2)),
				umpires: umpires.pair(
					official.and_then(|o| o.umpire_id1),
					official.and_then(|o| o.umpire_id2),
				),
				winner: teams.get_opt(results.get(&game.match_id).and_then(|r| r.winner_id)),
				player_of_match: players
					.get_opt(awards.get(&game.match_id).and_then(|a| a.player_of_the_match_id)),
			}
		})
		.collect()
}

pub fn sides_of(tables: &Tables) -> HashMap<i64, &MatchTeams> {
	index_by(&tables.match_teams, |mt| mt.match_id)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::BallKey;
	use crate::fixture;

	#[test]
	fn wicket_flag_follows_the_ball_key() {
		let tables = fixture::tables();
		let balls = balls(&tables);
		assert_eq!(balls.len(), tables.deliveries.len());

		for ball in &balls {
			let expected = tables.dismissals.iter().any(|d| d.key() == ball.delivery.key());
			assert_eq!(ball.is_wicket(), expected);
		}

		for match_id in [1, 2, 3] {
			let flagged = balls.iter().filter(|b| b.delivery.match_id == match_id && b.is_wicket()).count();
			let dismissed = tables.dismissals.iter().filter(|d| d.match_id == match_id).count();
			assert_eq!(flagged, dismissed);
		}
	}

	#[test]
	fn same_over_and_ball_in_other_inning_is_not_a_wicket() {
		let tables = fixture::tables();
		let balls = balls(&tables);

		// (1, 2, 0, 2) is out; (1, 1, 0, 2) shares match, over and ball but not the inning.
		let six = balls.iter().find(|b| b.delivery.key() == BallKey { match_id: 1, inning: 1, over: 0, ball: 2 });
		assert!(!six.unwrap().is_wicket());
	}

	#[test]
	fn deliveries_without_a_match_keep_their_row() {
		let mut tables = fixture::tables();
		tables.deliveries.push(fixture::delivery((99, 1, 0, 1, 7, 8, 10, 1, 2, 1, 1)));

		let balls = balls(&tables);
		assert_eq!(balls.len(), tables.deliveries.len());
		assert_eq!(balls.last().unwrap().season, None);
	}

	#[test]
	fn wickets_keep_dismissals_whose_ball_is_missing() {
		let mut tables = fixture::tables();
		tables.dismissals.push(fixture::dismissal(2, 1, 19, 6, "run out", Some(9)));

		let wickets = wickets(&tables);
		assert_eq!(wickets.len(), 4);
		assert_eq!(wickets[3].bowler(), None);
		assert_eq!(wickets[3].season, Some("2019"));
		assert_eq!(wickets[0].bowler(), Some(10));
	}

	#[test]
	fn match_sheet_aliases_each_side() {
		let tables = fixture::tables();
		let sheets = match_sheets(&tables);
		let second = &sheets[1];

		assert_eq!(second.teams, Aliased { first: Some("Chennai"), second: Some("Mumbai") });
		assert_eq!(second.umpires, Aliased { first: Some("A Dar"), second: Some("S Ravi") });
		assert_eq!(second.venue, Some("Chepauk"));
		assert_eq!(second.winner, Some("Chennai"));
		assert_eq!(second.player_of_match, Some("R Jadeja"));
	}

	#[test]
	fn match_sheet_tolerates_missing_partners() {
		let mut tables = fixture::tables();
		tables.results.clear();
		tables.umpire_matches.retain(|um| um.match_id != 3);

		let sheets = match_sheets(&tables);
		assert_eq!(sheets.len(), 3);
		assert_eq!(sheets[2].winner, None);
		assert_eq!(sheets[2].umpires, Aliased { first: None, second: None });
	}

	#[test]
	fn inner_join_drops_unmatched_rows() {
		let tables = fixture::tables();
		let mut dismissals = tables.dismissals.clone();
		dismissals.push(fixture::dismissal(5, 1, 0, 1, "bowled", None));

		let joined = inner_join(&dismissals, &tables.deliveries, Dismissal::key, Delivery::key);
		assert_eq!(joined.len(), 3);
	}
}
