use std::collections::HashSet;

use crate::data::{Match, TossDecision};
use crate::join::index_by;
use crate::report::{name_of, Outcome, Report};
use crate::resolve;
use crate::store::Tables;

fn matches_at(tables: &Tables, venue: i64) -> Vec<&Match> {
	tables.matches.iter().filter(|m| m.venue_id == Some(venue)).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VenueResults {
	pub played: usize,
	pub batting_first: usize,
	pub batting_second: usize,
	pub abandoned: usize,
}

/// Wins split by innings order, derived from the toss winner's decision.
/// A match without a winner is abandoned; a win without a usable toss is counted in neither column.
pub fn tally(tables: &Tables, games: &[&Match]) -> VenueResults {
	let results = index_by(&tables.results, |r| r.match_id);
	let tosses = index_by(&tables.tosses, |t| t.match_id);

	let mut tally = VenueResults {
		played: games.len(),
		..Default::default()
	};
	for game in games {
		let Some(winner) = results.get(&game.match_id).and_then(|r| r.winner_id) else {
			tally.abandoned += 1;
			continue;
		};
		let Some(toss) = tosses.get(&game.match_id) else {
			continue;
		};

		let toss_winner_won = toss.toss_winner == Some(winner);
		match (toss.decision(), toss_winner_won) {
			(Some(TossDecision::Bat), true) | (Some(TossDecision::Field), false) => tally.batting_first += 1,
			(Some(TossDecision::Bat), false) | (Some(TossDecision::Field), true) => tally.batting_second += 1,
			(None, _) => {}
		}
	}

	tally
}

pub fn results(title: &str, tables: &Tables, query: &str) -> Outcome {
	let venue = resolve::venue(tables, query)?;
	let games = matches_at(tables, venue);
	if games.is_empty() {
		return Ok(Report::no_data(title, "No matches played at this venue."));
	}

	let tally = tally(tables, &games);
	Ok(Report::new(
		title,
		vec![
			format!("Venue Name: {}", name_of(&tables.venues, venue)),
			format!("Total matches played: {}", tally.played),
			format!("Matches won while batting first: {}", tally.batting_first),
			format!("Matches won while batting second: {}", tally.batting_second),
			format!("Matches abandoned: {}", tally.abandoned),
		],
	))
}

/// Total first-innings runs at the venue over the number of matches played there.
pub fn average_first_innings(tables: &Tables, games: &[&Match]) -> f64 {
	if games.is_empty() {
		return 0.0;
	}

	let ids: HashSet<i64> = games.iter().map(|m| m.match_id).collect();
	let runs: i64 = tables
		.deliveries
		.iter()
		.filter(|d| d.inning == 1 && ids.contains(&d.match_id))
		.map(|d| d.total_runs)
		.sum();

	runs as f64 / games.len() as f64
}

pub fn first_innings(title: &str, tables: &Tables, query: &str) -> Outcome {
	let venue = resolve::venue(tables, query)?;
	let games = matches_at(tables, venue);
	if games.is_empty() {
		return Ok(Report::no_data(title, "No matches played in this venue."));
	}

	Ok(Report::new(
		title,
		vec![
			format!("Venue Name: {}", name_of(&tables.venues, venue)),
			format!("Total matches played: {}", games.len()),
			format!("Average first innings score: {:.2}", average_first_innings(tables, &games)),
		],
	))
}
