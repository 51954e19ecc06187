use std::collections::HashSet;

use crate::aggregate::{by_desc, finals_by_season, group_count, top_n};
use crate::data::{Match, PLAYOFF_APPEARANCE_STAGES, PLAYOFF_STAGES};
use crate::join::{index_by, inner_join, Names};
use crate::report::{name_of, Report};
use crate::store::Tables;

fn stage_ids(tables: &Tables, stages: &[&str]) -> HashSet<i64> {
	tables
		.matches
		.iter()
		.filter(|m| m.is_stage(stages))
		.map(|m| m.match_id)
		.collect()
}

/// Teams by number of playoff matches played, most first.
pub fn playoff_appearances(tables: &Tables) -> Vec<(i64, usize)> {
	let playoffs = stage_ids(tables, PLAYOFF_APPEARANCE_STAGES);
	let sides: Vec<_> = tables
		.match_teams
		.iter()
		.filter(|mt| playoffs.contains(&mt.match_id))
		.collect();

	let counts = group_count(
		sides.iter().map(|mt| mt.team_id1).chain(sides.iter().map(|mt| mt.team_id2)),
		|team| *team,
	);
	top_n(counts, usize::MAX, |a, b| by_desc(a.1, b.1))
}

pub fn appearances(title: &str, tables: &Tables) -> Report {
	let lines = playoff_appearances(tables)
		.into_iter()
		.take(10)
		.map(|(team, n)| format!("{}: {n} playoff matches appearance", name_of(&tables.teams, team)))
		.collect();
	Report::or_no_data(title, lines, "No playoff matches found.")
}

/// The deciding final of every season with its winner, ordered by date and then season.
/// Finals without a parseable date sort last.
pub fn finals(tables: &Tables) -> Vec<(&str, &Match, Option<i64>)> {
	let results = index_by(&tables.results, |r| r.match_id);
	let mut finals: Vec<_> = finals_by_season(&tables.matches)
		.into_iter()
		.map(|(season, game)| (season, game, results.get(&game.match_id).and_then(|r| r.winner_id)))
		.collect();

	finals.sort_by(|a, b| {
		let (x, y) = (a.1.played_on(), b.1.played_on());
		x.is_none().cmp(&y.is_none()).then(x.cmp(&y)).then(a.0.cmp(b.0))
	});
	finals
}

pub fn finals_winners(title: &str, tables: &Tables) -> Report {
	let teams = Names::of(&tables.teams);
	let lines = finals(tables)
		.into_iter()
		.map(|(season, _, winner)| format!("{season}: {}", teams.get_opt(winner).unwrap_or("Unknown")))
		.collect();
	Report::or_no_data(title, lines, "No Finals found (check match_type values).")
}

pub fn player_of_match(title: &str, tables: &Tables) -> Report {
	let playoffs: Vec<Match> = tables
		.matches
		.iter()
		.filter(|m| m.is_stage(PLAYOFF_STAGES))
		.cloned()
		.collect();
	if playoffs.is_empty() {
		return Report::no_data(title, "No playoff matches found.");
	}

	let players = Names::of(&tables.players);
	let lines = inner_join(&tables.player_of_match, &playoffs, |p| p.match_id, |m| m.match_id)
		.into_iter()
		.map(|(award, game)| {
			format!(
				"{}: {} ({})",
				game.date,
				players.get_opt(award.player_of_the_match_id).unwrap_or("Unknown Player"),
				game.match_type
			)
		})
		.collect();
	Report::or_no_data(title, lines, "No Player-of-the-Match data for playoff matches.")
}
