use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::aggregate::{argmax_per, batting_average, group_count, group_sum, strike_rate, Groups};
use crate::join::{balls, index_by, inner_join, wickets, MatchIndex};
use crate::report::{name_of, Outcome, Report};
use crate::resolve;
use crate::store::Tables;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CareerTotals {
	pub runs: i64,
	pub wickets: usize,
	pub catches: usize,
	pub matches: usize,
}

pub fn career_totals(tables: &Tables, player: i64) -> CareerTotals {
	let mut played = HashSet::new();
	let mut runs = 0;

	for d in &tables.deliveries {
		if d.batter_id == player {
			runs += d.batsman_runs;
			played.insert(d.match_id);
		}
	}

	let mut taken = 0;
	for w in wickets(tables).into_iter().filter(|w| w.bowler() == Some(player)) {
		taken += 1;
		played.insert(w.dismissal.match_id);
	}

	let mut catches = 0;
	for d in tables.dismissals.iter().filter(|d| d.is_catch_by(player)) {
		catches += 1;
		played.insert(d.match_id);
	}

	CareerTotals {
		runs,
		wickets: taken,
		catches,
		matches: played.len(),
	}
}

pub fn stats(title: &str, tables: &Tables, query: &str) -> Outcome {
	let player = resolve::player(tables, query)?;
	let totals = career_totals(tables, player);

	Ok(Report::new(
		title,
		vec![
			format!("Player Name: {}", name_of(&tables.players, player)),
			format!("Runs Scored: {}", totals.runs),
			format!("Wickets Taken: {}", totals.wickets),
			format!("Catches Taken: {}", totals.catches),
			format!("Total number of matches played by the player: {}", totals.matches),
		],
	))
}

pub fn awards(title: &str, tables: &Tables, query: &str) -> Outcome {
	let player = resolve::player(tables, query)?;
	let name = name_of(&tables.players, player);

	let mine: Vec<_> = tables
		.player_of_match
		.iter()
		.filter(|p| p.player_of_the_match_id == Some(player))
		.cloned()
		.collect();
	let with_match = inner_join(&mine, &tables.matches, |p| p.match_id, |m| m.match_id);
	let venues = index_by(&tables.venues, |v| v.id);

	let rows: Vec<String> = with_match
		.iter()
		.filter_map(|(_, game)| {
			let venue = venues.get(&game.venue_id?)?;
			Some((game.date.as_str(), venue.name.as_str()))
		})
		.enumerate()
		.map(|(i, (date, venue))| format!("{} | {name} | {date} | {venue}", i + 1))
		.collect();

	if rows.is_empty() {
		return Ok(Report::no_data(title, format!("{name} has never been Player of the Match.")));
	}

	let mut lines = vec![
		format!("Player Name: {name}"),
		format!("Total number of matches in which the player was Player of the Match: {}", rows.len()),
		"Player of the Match in the following matches:".to_string(),
	];
	lines.extend(rows);
	Ok(Report::new(title, lines))
}

/// Season to team: the batting side of the first ball faced, else the bowling
/// side of the first ball bowled, else the fielding side of the first catch.
pub fn seasons_and_teams(tables: &Tables, player: i64) -> BTreeMap<&str, i64> {
	let matches = MatchIndex::new(&tables.matches);
	let mut history = BTreeMap::new();

	for d in tables.deliveries.iter().filter(|d| d.batter_id == player) {
		if let Some(season) = matches.season(d.match_id) {
			history.entry(season).or_insert(d.batting_team_id);
		}
	}
	for d in tables.deliveries.iter().filter(|d| d.bowler_id == player) {
		if let Some(season) = matches.season(d.match_id) {
			history.entry(season).or_insert(d.bowling_team_id);
		}
	}
	for w in wickets(tables).iter().filter(|w| w.dismissal.is_catch_by(player)) {
		if let (Some(season), Some(d)) = (w.season, w.delivery) {
			history.entry(season).or_insert(d.bowling_team_id);
		}
	}

	history
}

pub fn team_history(title: &str, tables: &Tables, query: &str) -> Outcome {
	let player = resolve::player(tables, query)?;
	let name = name_of(&tables.players, player);
	let teams = index_by(&tables.teams, |t| t.id);

	let rows: Vec<String> = seasons_and_teams(tables, player)
		.into_iter()
		.map(|(season, team)| {
			let team = teams.get(&team).map_or("Not Played", |t| t.name.as_str());
			format!("Season {season}: {team}")
		})
		.collect();

	if rows.is_empty() {
		return Ok(Report::no_data(title, format!("No matches found for {name}.")));
	}

	let mut lines = vec![format!("Player Name: {name}"), "Team history:".to_string()];
	lines.extend(rows);
	Ok(Report::new(title, lines))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Duel {
	pub balls: usize,
	pub runs: i64,
	pub wickets: usize,
	pub dots: usize,
}

pub fn duel(tables: &Tables, bowler: i64, batter: i64) -> Duel {
	balls(tables)
		.iter()
		.filter(|b| b.delivery.bowler_id == bowler && b.delivery.batter_id == batter)
		.fold(Duel::default(), |mut acc, b| {
			acc.balls += 1;
			acc.runs += b.delivery.batsman_runs;
			acc.wickets += usize::from(b.is_wicket());
			acc.dots += usize::from(b.is_dot());
			acc
		})
}

pub fn bowler_vs_batter(title: &str, tables: &Tables, bowler: &str, batter: &str) -> Outcome {
	let bowler = resolve::player(tables, bowler)?;
	let batter = resolve::player(tables, batter)?;
	let duel = duel(tables, bowler, batter);

	if duel.balls == 0 {
		return Ok(Report::no_data(title, "No deliveries found between this bowler and batter."));
	}

	Ok(Report::new(
		title,
		vec![
			format!(
				"Head-to-Head: {} vs {}",
				name_of(&tables.players, bowler),
				name_of(&tables.players, batter)
			),
			format!("Balls Bowled: {}", duel.balls),
			format!("Runs Scored: {}", duel.runs),
			format!("Wickets Taken: {}", duel.wickets),
			format!("Dot Balls: {}", duel.dots),
		],
	))
}

/// Highest-run and highest-wicket seasons; the earlier season keeps a tie.
pub fn best_seasons(tables: &Tables, player: i64) -> (Option<(&str, i64)>, Option<(&str, usize)>) {
	let matches = MatchIndex::new(&tables.matches);

	let runs = group_sum(
		tables
			.deliveries
			.iter()
			.filter(|d| d.batter_id == player)
			.filter_map(|d| Some((matches.season(d.match_id)?, d.batsman_runs))),
		|(season, _)| *season,
		|(_, runs)| *runs,
	);
	let wickets = group_count(
		wickets(tables)
			.into_iter()
			.filter(|w| w.bowler() == Some(player))
			.filter_map(|w| w.season),
		|season| *season,
	);

	let best_runs = argmax_per(runs, |_| (), |(_, runs)| *runs).pop().map(|(_, best)| best);
	let best_wickets = argmax_per(wickets, |_| (), |(_, n)| *n).pop().map(|(_, best)| best);

	(best_runs, best_wickets)
}

pub fn best_season(title: &str, tables: &Tables, query: &str) -> Outcome {
	let player = resolve::player(tables, query)?;
	let (runs, wickets) = best_seasons(tables, player);

	let mut lines = vec![format!("Player Name: {}", name_of(&tables.players, player))];
	lines.push(match runs {
		Some((season, runs)) => format!("Best batting season: {season} with {runs} runs"),
		None => "No batting records found.".to_string(),
	});
	lines.push(match wickets {
		Some((season, wickets)) => format!("Best bowling season: {season} with {wickets} wickets"),
		None => "No bowling records found.".to_string(),
	});

	Ok(Report::new(title, lines))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BattingTally {
	pub balls: usize,
	pub runs: i64,
	pub outs: usize,
}

pub fn batting_by_season(tables: &Tables, player: i64) -> Vec<(&str, BattingTally)> {
	let mut seasons: Groups<&str, BattingTally> = Groups::new();
	for b in balls(tables).into_iter().filter(|b| b.delivery.batter_id == player) {
		let Some(season) = b.season else {
			continue;
		};
		let tally = seasons.entry(season);
		tally.balls += 1;
		tally.runs += b.delivery.batsman_runs;
		tally.outs += usize::from(b.is_wicket());
	}

	let mut seasons = seasons.into_vec();
	seasons.sort_by(|a, b| a.0.cmp(b.0));
	debug!("Player {player} batted in {} seasons", seasons.len());
	seasons
}

pub fn season_form(title: &str, tables: &Tables, query: &str) -> Outcome {
	let player = resolve::player(tables, query)?;
	let name = name_of(&tables.players, player);

	let rows: Vec<String> = batting_by_season(tables, player)
		.into_iter()
		.map(|(season, t)| {
			let sr = strike_rate(t.runs, t.balls).unwrap_or(0.0);
			let avg = batting_average(t.runs, t.outs);
			format!(
				"{season}: SR={sr:.2}, Avg={avg} (Runs {}, Balls {}, Outs {})",
				t.runs, t.balls, t.outs
			)
		})
		.collect();

	if rows.is_empty() {
		return Ok(Report::no_data(title, "No batting records for this player."));
	}

	let mut lines = vec![format!("Season-wise SR & Avg for {name}:")];
	lines.extend(rows);
	Ok(Report::new(title, lines))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::{EntityKind, QueryError};
	use crate::fixture;
	use crate::report::Body;

	#[test]
	fn career_totals_cover_bat_ball_and_field() {
		let tables = fixture::tables();
		assert_eq!(
			career_totals(&tables, 10),
			CareerTotals { runs: 3, wickets: 2, catches: 1, matches: 2 }
		);
		assert_eq!(
			career_totals(&tables, 7),
			CareerTotals { runs: 111, wickets: 0, catches: 0, matches: 3 }
		);
	}

	#[test]
	fn unknown_player_is_not_found() {
		let tables = fixture::tables();
		assert_eq!(
			stats("Stats", &tables, "Tendulkar"),
			Err(QueryError::not_found(EntityKind::Player, "Tendulkar"))
		);
	}

	#[test]
	fn award_lines_list_date_and_venue() {
		let tables = fixture::tables();
		let report = awards("Awards", &tables, "kohli").unwrap();
		assert_eq!(report.lines()[1], "Total number of matches in which the player was Player of the Match: 2");
		assert_eq!(report.lines()[3], "1 | V Kohli | 2019-04-01 | Wankhede Stadium");
		assert_eq!(report.lines()[4], "2 | V Kohli | 2020-11-10 | Wankhede Stadium");
	}

	#[test]
	fn never_awarded_is_no_data() {
		let tables = fixture::tables();
		let report = awards("Awards", &tables, "Sharma").unwrap();
		assert_eq!(report.body, Body::NoData("R Sharma has never been Player of the Match.".into()));
	}

	#[test]
	fn history_prefers_batting_then_bowling_then_fielding() {
		let tables = fixture::tables();
		assert_eq!(seasons_and_teams(&tables, 7).into_iter().collect::<Vec<_>>(), vec![("2019", 1), ("2020", 1)]);
		assert_eq!(seasons_and_teams(&tables, 9).into_iter().collect::<Vec<_>>(), vec![("2019", 1)]);
		assert_eq!(seasons_and_teams(&tables, 11).into_iter().collect::<Vec<_>>(), vec![("2019", 2)]);
	}

	#[test]
	fn fielding_alone_places_a_player() {
		let mut tables = fixture::tables();
		tables.dismissals[1] = fixture::dismissal(1, 2, 0, 2, "caught", Some(12));
		tables.players.push(crate::data::Player { id: 12, name: "K Pollard".into() });

		assert_eq!(seasons_and_teams(&tables, 12).into_iter().collect::<Vec<_>>(), vec![("2019", 1)]);
	}

	#[test]
	fn duel_counts_balls_runs_wickets_and_dots() {
		let tables = fixture::tables();
		assert_eq!(duel(&tables, 10, 7), Duel { balls: 6, runs: 111, wickets: 1, dots: 2 });

		let report = bowler_vs_batter("Duel", &tables, "jadeja", "kohli").unwrap();
		assert_eq!(report.lines()[0], "Head-to-Head: R Jadeja vs V Kohli");
	}

	#[test]
	fn duel_without_deliveries_is_no_data() {
		let tables = fixture::tables();
		let report = bowler_vs_batter("Duel", &tables, "bumrah", "kohli").unwrap();
		assert!(matches!(report.body, Body::NoData(_)));
	}

	#[test]
	fn best_seasons_pick_the_maximum() {
		let tables = fixture::tables();
		assert_eq!(best_seasons(&tables, 7), (Some(("2020", 100)), None));
		assert_eq!(best_seasons(&tables, 10), (Some(("2019", 3)), Some(("2019", 2))));
	}

	#[test]
	fn season_form_reports_na_without_outs() {
		let tables = fixture::tables();
		let report = season_form("Form", &tables, "kohli").unwrap();
		assert_eq!(
			report.lines(),
			[
				"Season-wise SR & Avg for V Kohli:",
				"2019: SR=220.00, Avg=11.00 (Runs 11, Balls 5, Outs 1)",
				"2020: SR=10000.00, Avg=NA (Runs 100, Balls 1, Outs 0)",
			]
		);
	}
}
