//! League-wide reports grouped by season.

use std::collections::HashMap;

use log::debug;

use crate::aggregate::{
	argmax_per, at_least, by_asc, by_desc, economy as economy_rate, finals_by_season, group_count, group_sum, top_n,
	unordered_pair, Groups,
};
use crate::join::{balls, index_by, sides_of, Ball, MatchIndex, Names};
use crate::report::{name_of, Report};
use crate::season::SeasonFilter;
use crate::store::Tables;

fn by_season<T>(mut rows: Vec<(&str, T)>) -> Vec<(&str, T)> {
	rows.sort_by(|a, b| a.0.cmp(b.0));
	rows
}

fn filtered<'a>(tables: &'a Tables, filter: &SeasonFilter) -> Vec<Ball<'a>> {
	let balls: Vec<_> = balls(tables).into_iter().filter(|b| filter.matches(b.season)).collect();
	debug!("{} deliveries in season {}", balls.len(), filter.label());
	balls
}

pub fn boundary_counts(tables: &Tables) -> Vec<(&str, (usize, usize))> {
	let mut seasons: Groups<&str, (usize, usize)> = Groups::new();
	for b in balls(tables) {
		let Some(season) = b.season else {
			continue;
		};
		let counts = seasons.entry(season);
		counts.0 += usize::from(b.delivery.is_four());
		counts.1 += usize::from(b.delivery.is_six());
	}
	by_season(seasons.into_vec())
}

pub fn boundaries(title: &str, tables: &Tables) -> Report {
	let lines = boundary_counts(tables)
		.into_iter()
		.map(|(season, (fours, sixes))| format!("Season {season}: 4s = {fours}, 6s = {sixes}"))
		.collect();
	Report::or_no_data(title, lines, "No deliveries found.")
}

/// One player's contribution to one season.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeasonTally {
	pub runs: i64,
	pub fours: i64,
	pub sixes: i64,
	pub wickets: i64,
	pub dots: i64,
}

/// Per `(season, player)` tallies from a single pass over every ball, in first-seen order.
/// Batting columns go to the batter; wickets and dot balls (no run, no wicket) to the bowler.
pub fn season_tallies(tables: &Tables) -> Vec<((&str, i64), SeasonTally)> {
	let mut tallies: Groups<(&str, i64), SeasonTally> = Groups::new();
	for b in balls(tables) {
		let Some(season) = b.season else {
			continue;
		};
		let d = b.delivery;

		let batting = tallies.entry((season, d.batter_id));
		batting.runs += d.batsman_runs;
		batting.fours += i64::from(d.is_four());
		batting.sixes += i64::from(d.is_six());

		let bowling = tallies.entry((season, d.bowler_id));
		if b.is_wicket() {
			bowling.wickets += 1;
		} else if b.is_dot() {
			bowling.dots += 1;
		}
	}
	tallies.into_vec()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leader {
	pub player: i64,
	pub value: i64,
}

fn leaders<'a>(
	tallies: &[((&'a str, i64), SeasonTally)],
	metric: impl Fn(&SeasonTally) -> i64,
) -> HashMap<&'a str, Leader> {
	argmax_per(tallies.iter(), |((season, _), _)| *season, |(_, t)| metric(t))
		.into_iter()
		.filter_map(|(season, ((_, player), t))| {
			let value = metric(t);
			(value > 0).then_some((season, Leader { player: *player, value }))
		})
		.collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonAwards<'a> {
	pub season: &'a str,
	pub orange_cap: Option<Leader>,
	pub purple_cap: Option<Leader>,
	pub most_sixes: Option<Leader>,
	pub most_fours: Option<Leader>,
	pub most_dots: Option<Leader>,
	pub winner: Option<i64>,
	pub runner_up: Option<i64>,
}

pub fn season_awards(tables: &Tables) -> Vec<SeasonAwards<'_>> {
	let tallies = season_tallies(tables);
	let orange = leaders(&tallies, |t| t.runs);
	let purple = leaders(&tallies, |t| t.wickets);
	let sixes = leaders(&tallies, |t| t.sixes);
	let fours = leaders(&tallies, |t| t.fours);
	let dots = leaders(&tallies, |t| t.dots);

	let results = index_by(&tables.results, |r| r.match_id);
	let sides = sides_of(tables);
	let finals: HashMap<&str, (i64, Option<i64>)> = finals_by_season(&tables.matches)
		.into_iter()
		.filter_map(|(season, game)| {
			let winner = results.get(&game.match_id)?.winner_id?;
			let runner_up = sides.get(&game.match_id).map(|mt| mt.opponent_of(winner));
			Some((season, (winner, runner_up)))
		})
		.collect();

	let mut seasons: Vec<&str> = Vec::new();
	for ((season, _), _) in &tallies {
		if !seasons.contains(season) {
			seasons.push(*season);
		}
	}
	seasons.sort_unstable();

	seasons
		.into_iter()
		.map(|season| SeasonAwards {
			season,
			orange_cap: orange.get(season).copied(),
			purple_cap: purple.get(season).copied(),
			most_sixes: sixes.get(season).copied(),
			most_fours: fours.get(season).copied(),
			most_dots: dots.get(season).copied(),
			winner: finals.get(season).map(|f| f.0),
			runner_up: finals.get(season).and_then(|f| f.1),
		})
		.collect()
}

pub fn awards(title: &str, tables: &Tables, season: &str) -> Report {
	let filter = SeasonFilter::parse(season);
	let players = Names::of(&tables.players);
	let teams = Names::of(&tables.teams);

	let leader = |label: &str, leader: Option<Leader>, unit: &str| match leader {
		Some(l) => format!("{label}: {} ({} {unit})", players.label(l.player), l.value),
		None => format!("{label}: -"),
	};
	let team = |id: Option<i64>| id.and_then(|id| teams.get(id)).unwrap_or("Unknown");

	let mut lines = Vec::new();
	for awards in season_awards(tables).into_iter().filter(|a| filter.matches(Some(a.season))) {
		lines.push(format!("Season {}:", awards.season));
		lines.push(leader("Orange Cap", awards.orange_cap, "runs"));
		lines.push(leader("Purple Cap", awards.purple_cap, "wickets"));
		lines.push(leader("Most Sixes", awards.most_sixes, "sixes"));
		lines.push(leader("Most Fours", awards.most_fours, "fours"));
		lines.push(leader("Most Dot Balls", awards.most_dots, "dot balls"));
		lines.push(format!("Winner: {}", team(awards.winner)));
		lines.push(format!("Runner Up: {}", team(awards.runner_up)));
	}

	Report::or_no_data(title, lines, format!("No data found for season {}.", filter.label()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Milestones {
	pub fifties: usize,
	pub hundreds: usize,
}

/// Per season, the batter with most fifties and the batter with most hundreds.
pub fn milestone_leaders(tables: &Tables) -> Vec<(&str, (i64, usize), (i64, usize))> {
	let innings = group_sum(
		balls(tables).into_iter().filter_map(|b| Some((b.season?, b.delivery))),
		|(season, d)| (*season, d.batter_id, d.match_id),
		|(_, d)| d.batsman_runs,
	);

	let mut per_player: Groups<(&str, i64), Milestones> = Groups::new();
	for ((season, batter, _), runs) in innings {
		let m = per_player.entry((season, batter));
		m.fifties += usize::from((50..=99).contains(&runs));
		m.hundreds += usize::from(runs >= 100);
	}
	let per_player = per_player.into_vec();

	let fifties: HashMap<_, _> = argmax_per(per_player.iter(), |((s, _), _)| *s, |(_, m)| m.fifties)
		.into_iter()
		.map(|(s, ((_, p), m))| (s, (*p, m.fifties)))
		.collect();
	let hundreds: Vec<_> = argmax_per(per_player.iter(), |((s, _), _)| *s, |(_, m)| m.hundreds)
		.into_iter()
		.map(|(s, ((_, p), m))| (s, (*p, m.hundreds)))
		.collect();

	by_season(hundreds)
		.into_iter()
		.filter_map(|(s, hundreds)| Some((s, *fifties.get(s)?, hundreds)))
		.collect()
}

pub fn milestones(title: &str, tables: &Tables) -> Report {
	let show = |(player, n): (i64, usize), unit: &str| {
		if n == 0 {
			"none".to_string()
		} else {
			format!("{} ({n} {unit})", name_of(&tables.players, player))
		}
	};

	let mut lines = Vec::new();
	for (season, fifties, hundreds) in milestone_leaders(tables) {
		lines.push(format!("Season {season}:"));
		lines.push(format!("Most Fifties: {}", show(fifties, "fifties")));
		lines.push(format!("Most Hundreds: {}", show(hundreds, "hundreds")));
	}
	Report::or_no_data(title, lines, "No deliveries found.")
}

pub const HAUL: usize = 5;

/// Per season, the bowler with most innings of five or more wickets.
pub fn haul_leaders(tables: &Tables) -> Vec<(&str, i64, usize)> {
	let per_match = group_count(
		balls(tables)
			.into_iter()
			.filter(Ball::is_wicket)
			.filter_map(|b| Some((b.season?, b.delivery.bowler_id, b.delivery.match_id))),
		|key| *key,
	);
	let hauls = group_count(
		per_match.into_iter().filter(|(_, n)| *n >= HAUL).map(|((s, bowler, _), _)| (s, bowler)),
		|key| *key,
	);

	let mut leaders: Vec<_> = argmax_per(hauls, |((s, _), _)| *s, |(_, n)| *n)
		.into_iter()
		.map(|(s, ((_, bowler), n))| (s, bowler, n))
		.collect();
	leaders.sort_by(|a, b| a.0.cmp(b.0));
	leaders
}

pub fn five_wicket_hauls(title: &str, tables: &Tables) -> Report {
	let lines = haul_leaders(tables)
		.into_iter()
		.map(|(season, bowler, n)| {
			format!("Season {season}: {} ({n} times)", name_of(&tables.players, bowler))
		})
		.collect();
	Report::or_no_data(title, lines, "No five-wicket hauls recorded.")
}

pub fn top_scorers(title: &str, tables: &Tables, season: &str) -> Report {
	let filter = SeasonFilter::parse(season);
	let balls = filtered(tables, &filter);
	if balls.is_empty() {
		return Report::no_data(title, "No data for that season.");
	}

	let runs = group_sum(balls, |b| b.delivery.batter_id, |b| b.delivery.batsman_runs);
	let mut lines = vec![format!("Top run-scorers in season {} (top 10):", filter.label())];
	lines.extend(
		top_n(runs, 10, |a, b| by_desc(a.1, b.1))
			.into_iter()
			.map(|(batter, runs)| format!("{}: {runs} runs", name_of(&tables.players, batter))),
	);
	Report::new(title, lines)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spell {
	pub balls: usize,
	pub runs: i64,
}

pub fn economy(title: &str, tables: &Tables, season: &str, min_balls: usize) -> Report {
	let filter = SeasonFilter::parse(season);
	let balls = filtered(tables, &filter);
	if balls.is_empty() {
		return Report::no_data(title, "No data for that season.");
	}

	let mut bowlers: Groups<i64, Spell> = Groups::new();
	for b in balls.iter().filter(|b| b.delivery.bowler_id > 0) {
		let spell = bowlers.entry(b.delivery.bowler_id);
		spell.balls += 1;
		spell.runs += b.delivery.total_runs;
	}

	let qualified = at_least(bowlers.into_vec(), min_balls, |(_, s)| s.balls);
	if qualified.is_empty() {
		return Report::no_data(title, format!("No bowlers with at least {min_balls} balls in given season."));
	}

	let rated: Vec<_> = qualified
		.into_iter()
		.filter_map(|(bowler, s)| Some((bowler, s, economy_rate(s.runs, s.balls)?)))
		.collect();

	let mut lines = vec![format!(
		"Top economical bowlers in season {} (min {min_balls} balls):",
		filter.label()
	)];
	lines.extend(top_n(rated, 10, |a, b| by_asc(a.2, b.2)).into_iter().map(|(bowler, s, e)| {
		format!(
			"{}: economy {e:.2} (Balls {}, Runs {})",
			name_of(&tables.players, bowler),
			s.balls,
			s.runs
		)
	}));
	Report::new(title, lines)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partnership {
	pub pair: (i64, i64),
	pub runs: i64,
}

/// Per season, the best batter/non-striker pair within a single innings.
pub fn best_partnerships<'a>(tables: &'a Tables, filter: &SeasonFilter) -> Vec<(&'a str, Partnership)> {
	let stands = group_sum(
		filtered(tables, filter).into_iter().filter_map(|b| Some((b.season?, b.delivery))),
		|(season, d)| (*season, d.match_id, d.inning, unordered_pair(d.batter_id, d.non_striker_id)),
		|(_, d)| d.batsman_runs,
	);

	let best: Vec<_> = argmax_per(stands, |((season, ..), _)| *season, |(_, runs)| *runs)
		.into_iter()
		.map(|(season, ((.., pair), runs))| (season, Partnership { pair, runs }))
		.collect();
	by_season(best)
}

pub fn partnerships(title: &str, tables: &Tables, season: &str) -> Report {
	let filter = SeasonFilter::parse(season);
	let players = Names::of(&tables.players);

	let lines = best_partnerships(tables, &filter)
		.into_iter()
		.map(|(season, p)| {
			format!(
				"Season {season}: {} & {} -> {} runs",
				players.label(p.pair.0),
				players.label(p.pair.1),
				p.runs
			)
		})
		.collect();
	Report::or_no_data(title, lines, "No deliveries for the specified season.")
}

pub fn highest_scoring(title: &str, tables: &Tables, season: &str) -> Report {
	let filter = SeasonFilter::parse(season);
	let balls = filtered(tables, &filter);
	if balls.is_empty() {
		return Report::no_data(title, "No deliveries for that season.");
	}

	let totals = group_sum(balls, |b| b.delivery.match_id, |b| b.delivery.total_runs);
	let matches = MatchIndex::new(&tables.matches);
	let sides = sides_of(tables);
	let teams = Names::of(&tables.teams);

	let mut lines = vec![format!("Top 10 highest-scoring matches in season {}:", filter.label())];
	for (match_id, total) in top_n(totals, 10, |a, b| by_desc(a.1, b.1)) {
		let game = matches.get(match_id);
		let side = sides.get(&match_id);
		let team = |id: Option<i64>| id.and_then(|id| teams.get(id)).unwrap_or("Unknown");

		lines.push(format!(
			"{} | {}: {} vs {} -> Total runs {total}",
			game.map_or("", |g| g.season.as_str()),
			game.map_or("", |g| g.date.as_str()),
			team(side.map(|s| s.team_id1)),
			team(side.map(|s| s.team_id2)),
		));
	}
	Report::new(title, lines)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixture;
	use crate::report::Body;

	#[test]
	fn boundaries_per_season() {
		let tables = fixture::tables();
		let report = boundaries("Boundaries", &tables);
		assert_eq!(report.lines(), ["Season 2019: 4s = 2, 6s = 2", "Season 2020: 4s = 0, 6s = 0"]);
	}

	#[test]
	fn dot_ball_excludes_wickets() {
		let tables = fixture::tables();
		let tallies = season_tallies(&tables);
		let jadeja = tallies.iter().find(|(key, _)| *key == ("2019", 10)).unwrap().1;
		assert_eq!(jadeja.wickets, 2);
		assert_eq!(jadeja.dots, 1);
		assert_eq!(jadeja.runs, 3);
	}

	#[test]
	fn season_awards_pick_leaders_and_finalists() {
		let tables = fixture::tables();
		let report = awards("Awards", &tables, "2019");
		assert_eq!(
			report.lines(),
			[
				"Season 2019:",
				"Orange Cap: V Kohli (11 runs)",
				"Purple Cap: R Jadeja (2 wickets)",
				"Most Sixes: V Kohli (1 sixes)",
				"Most Fours: V Kohli (1 fours)",
				"Most Dot Balls: R Jadeja (1 dot balls)",
				"Winner: Chennai",
				"Runner Up: Mumbai",
			]
		);
	}

	#[test]
	fn awards_without_a_leader_show_a_dash() {
		let tables = fixture::tables();
		let report = awards("Awards", &tables, "2020");
		assert_eq!(report.lines()[2], "Purple Cap: -");
		assert_eq!(report.lines()[6], "Winner: Mumbai");

		let missing = awards("Awards", &tables, "2031");
		assert_eq!(missing.body, Body::NoData("No data found for season 2031.".into()));
	}

	#[test]
	fn tied_leaders_go_to_the_first_seen_player() {
		let mut tables = fixture::tables();
		// Give Dhoni Kohli's 2020 total in an earlier row of the same season.
		tables.deliveries.insert(12, fixture::delivery((3, 1, 0, 0, 11, 7, 9, 2, 1, 100, 100)));

		let awards = season_awards(&tables);
		assert_eq!(awards[1].orange_cap, Some(Leader { player: 11, value: 100 }));
	}

	#[test]
	fn milestones_report_none_without_any() {
		let tables = fixture::tables();
		let report = milestones("Milestones", &tables);
		assert_eq!(
			report.lines(),
			[
				"Season 2019:",
				"Most Fifties: none",
				"Most Hundreds: none",
				"Season 2020:",
				"Most Fifties: none",
				"Most Hundreds: V Kohli (1 hundreds)",
			]
		);
	}

	#[test]
	fn five_wicket_haul_needs_five_in_one_match() {
		let mut tables = fixture::tables();
		assert!(matches!(five_wicket_hauls("Hauls", &tables).body, Body::NoData(_)));

		for ball in 1..=5 {
			tables.deliveries.push(fixture::delivery((3, 2, 1, ball, 11, 10, 9, 2, 1, 0, 0)));
			tables.dismissals.push(fixture::dismissal(3, 2, 1, ball, "bowled", None));
		}
		assert_eq!(haul_leaders(&tables), vec![("2020", 9, 1)]);
		assert_eq!(five_wicket_hauls("Hauls", &tables).lines(), ["Season 2020: J Bumrah (1 times)"]);
	}

	#[test]
	fn top_scorer_for_a_single_season() {
		let tables = fixture::tables();
		let report = top_scorers("Top", &tables, "2020");
		assert_eq!(report.lines(), ["Top run-scorers in season 2020 (top 10):", "V Kohli: 100 runs"]);
	}

	#[test]
	fn economy_threshold_is_inclusive() {
		let tables = fixture::tables();

		let report = economy("Economy", &tables, "2019", 7);
		assert_eq!(report.lines()[1..], ["R Jadeja: economy 10.29 (Balls 7, Runs 12)"]);

		let both = economy("Economy", &tables, "2019", 5);
		assert_eq!(both.lines().len(), 3);
		assert!(both.lines()[2].starts_with("J Bumrah: economy 16.80"));

		let none = economy("Economy", &tables, "2019", 8);
		assert!(matches!(none.body, Body::NoData(_)));
	}

	#[test]
	fn partnerships_join_both_orderings() {
		let tables = fixture::tables();
		let report = partnerships("Partnerships", &tables, "");
		assert_eq!(
			report.lines(),
			[
				"Season 2019: V Kohli & R Sharma -> 11 runs",
				"Season 2020: V Kohli & R Sharma -> 100 runs",
			]
		);
	}

	#[test]
	fn highest_scoring_matches_are_ranked() {
		let tables = fixture::tables();
		let report = highest_scoring("Highest", &tables, "");
		assert_eq!(
			report.lines()[1..],
			[
				"2020 | 2020-11-10: Mumbai vs Chennai -> Total runs 100",
				"2019 | 2019-04-01: Mumbai vs Chennai -> Total runs 15",
				"2019 | 2019-05-12: Chennai vs Mumbai -> Total runs 11",
			]
		);
	}
}
