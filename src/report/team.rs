use std::collections::{HashMap, HashSet};

use log::debug;

use crate::aggregate::{at_least, by_desc, group_count, group_distinct, group_sum, strike_rate, top_n, unordered_pair, Groups};
use crate::data::POWERPLAY_OVERS;
use crate::join::{balls, wickets, MatchIndex};
use crate::report::{name_of, Outcome, Report};
use crate::resolve;
use crate::season::SeasonFilter;
use crate::store::Tables;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadToHead {
	pub played: usize,
	pub wins: (usize, usize),
	pub tosses: (usize, usize),
}

pub fn rivalry(tables: &Tables, a: i64, b: i64) -> HeadToHead {
	let pair = unordered_pair(a, b);
	let games: HashSet<i64> = tables
		.match_teams
		.iter()
		.filter(|mt| unordered_pair(mt.team_id1, mt.team_id2) == pair)
		.map(|mt| mt.match_id)
		.collect();

	let mut h2h = HeadToHead {
		played: games.len(),
		..Default::default()
	};
	for result in tables.results.iter().filter(|r| games.contains(&r.match_id)) {
		h2h.wins.0 += usize::from(result.winner_id == Some(a));
		h2h.wins.1 += usize::from(result.winner_id == Some(b));
	}
	for toss in tables.tosses.iter().filter(|t| games.contains(&t.match_id)) {
		h2h.tosses.0 += usize::from(toss.toss_winner == Some(a));
		h2h.tosses.1 += usize::from(toss.toss_winner == Some(b));
	}

	h2h
}

pub fn head_to_head(title: &str, tables: &Tables, first: &str, second: &str) -> Outcome {
	let a = resolve::team(tables, first)?;
	let b = resolve::team(tables, second)?;
	let (name_a, name_b) = (name_of(&tables.teams, a), name_of(&tables.teams, b));
	let h2h = rivalry(tables, a, b);

	Ok(Report::new(
		title,
		vec![
			format!("Head to head stats between {name_a} and {name_b}:"),
			format!("Total matches played: {}", h2h.played),
			format!("{name_a} wins: {}", h2h.wins.0),
			format!("{name_b} wins: {}", h2h.wins.1),
			format!("{name_a} toss wins: {}", h2h.tosses.0),
			format!("{name_b} toss wins: {}", h2h.tosses.1),
		],
	))
}

/// Per season: a total and the number of distinct matches it was spread over.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonAverage<'a> {
	pub season: &'a str,
	pub total: i64,
	pub matches: usize,
}

impl SeasonAverage<'_> {
	pub fn average(&self) -> f64 {
		if self.matches == 0 {
			0.0
		} else {
			self.total as f64 / self.matches as f64
		}
	}
}

fn sorted_by_season(mut rows: Vec<SeasonAverage<'_>>) -> Vec<SeasonAverage<'_>> {
	rows.sort_by(|a, b| a.season.cmp(b.season));
	rows
}

/// Powerplay runs over the matches in which the team batted in the powerplay.
pub fn powerplay_runs(tables: &Tables, team: i64) -> Vec<SeasonAverage<'_>> {
	let powerplay: Vec<_> = balls(tables)
		.into_iter()
		.filter(|b| b.delivery.batting_team_id == team && b.delivery.in_powerplay())
		.filter_map(|b| Some((b.season?, b.delivery)))
		.collect();

	let matches: HashMap<_, _> = group_distinct(powerplay.iter(), |(s, _)| *s, |(_, d)| d.match_id)
		.into_iter()
		.collect();
	let rows = group_sum(powerplay.iter(), |(s, _)| *s, |(_, d)| d.total_runs)
		.into_iter()
		.map(|(season, total)| SeasonAverage {
			season,
			total,
			matches: matches.get(season).copied().unwrap_or_default(),
		})
		.collect();

	sorted_by_season(rows)
}

/// Powerplay wickets over the distinct matches those wickets fell in. Seasons without a
/// powerplay wicket are left out.
pub fn powerplay_wickets_taken(tables: &Tables, team: i64) -> Vec<SeasonAverage<'_>> {
	let taken: Vec<_> = wickets(tables)
		.into_iter()
		.filter(|w| {
			w.dismissal.over < POWERPLAY_OVERS && w.delivery.is_some_and(|d| d.bowling_team_id == team)
		})
		.filter_map(|w| Some((w.season?, w.dismissal.match_id)))
		.collect();

	let matches: HashMap<_, _> = group_distinct(taken.iter(), |(s, _)| *s, |(_, match_id)| *match_id)
		.into_iter()
		.collect();
	let rows = group_count(taken.iter(), |(s, _)| *s)
		.into_iter()
		.map(|(season, total)| SeasonAverage {
			season,
			total: total as i64,
			matches: matches.get(season).copied().unwrap_or_default(),
		})
		.collect();

	sorted_by_season(rows)
}

pub fn powerplay_score(title: &str, tables: &Tables, query: &str) -> Outcome {
	let team = resolve::team(tables, query)?;
	let name = name_of(&tables.teams, team);

	let rows: Vec<String> = powerplay_runs(tables, team)
		.iter()
		.map(|s| format!("Season {}: Average powerplay score = {:.2}", s.season, s.average()))
		.collect();
	if rows.is_empty() {
		return Ok(Report::no_data(title, format!("No powerplay deliveries found for {name}.")));
	}

	let mut lines = vec![format!("Average powerplay score for {name} in each season:")];
	lines.extend(rows);
	Ok(Report::new(title, lines))
}

pub fn powerplay_wickets(title: &str, tables: &Tables, query: &str) -> Outcome {
	let team = resolve::team(tables, query)?;
	let name = name_of(&tables.teams, team);

	let rows: Vec<String> = powerplay_wickets_taken(tables, team)
		.iter()
		.map(|s| format!("Season {}: Average wickets taken = {:.2}", s.season, s.average()))
		.collect();
	if rows.is_empty() {
		return Ok(Report::no_data(title, format!("{name} took no powerplay wickets.")));
	}

	let mut lines = vec![format!("Average wickets taken in powerplay by {name} in each season:")];
	lines.extend(rows);
	Ok(Report::new(title, lines))
}

pub fn matches_per_season(title: &str, tables: &Tables, query: &str, season: &str) -> Outcome {
	let team = resolve::team(tables, query)?;
	let filter = SeasonFilter::parse(season);
	let matches = MatchIndex::new(&tables.matches);

	let mut counts = group_count(
		tables
			.match_teams
			.iter()
			.filter(|mt| mt.involves(team))
			.filter_map(|mt| matches.season(mt.match_id))
			.filter(|s| filter.matches(Some(*s))),
		|s| *s,
	);
	counts.sort_by(|a, b| a.0.cmp(b.0));

	if counts.is_empty() {
		return Ok(Report::no_data(title, "No matches found for given inputs."));
	}

	let mut lines = vec![format!("Matches for {}:", name_of(&tables.teams, team))];
	lines.extend(counts.into_iter().map(|(season, n)| format!("Season {season}: {n}")));
	Ok(Report::new(title, lines))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Innings {
	pub balls: usize,
	pub runs: i64,
}

pub fn strike_rates(title: &str, tables: &Tables, query: &str, season: &str, min_balls: usize) -> Outcome {
	let team = resolve::team(tables, query)?;
	let name = name_of(&tables.teams, team);
	let filter = SeasonFilter::parse(season);

	let mut batters: Groups<i64, Innings> = Groups::new();
	for b in balls(tables)
		.into_iter()
		.filter(|b| b.delivery.batting_team_id == team && filter.matches(b.season))
	{
		let innings = batters.entry(b.delivery.batter_id);
		innings.balls += 1;
		innings.runs += b.delivery.batsman_runs;
	}
	if batters.is_empty() {
		return Ok(Report::no_data(title, "No data for that team/season."));
	}

	let qualified = at_least(batters.into_vec(), min_balls, |(_, i)| i.balls);
	debug!("{} batters for team {team} reach {min_balls} balls", qualified.len());
	if qualified.is_empty() {
		return Ok(Report::no_data(title, format!("No batters with at least {min_balls} balls.")));
	}

	let rated: Vec<_> = qualified
		.into_iter()
		.map(|(batter, i)| (batter, i, strike_rate(i.runs, i.balls).unwrap_or(0.0)))
		.collect();

	let mut lines = vec![format!(
		"Top strike rates for {name} in {} (min {min_balls} balls):",
		filter.label()
	)];
	lines.extend(top_n(rated, 10, |a, b| by_desc(a.2, b.2)).into_iter().map(|(batter, i, sr)| {
		format!(
			"{}: SR {sr:.2} (Runs {}, Balls {})",
			name_of(&tables.players, batter),
			i.runs,
			i.balls
		)
	}));
	Ok(Report::new(title, lines))
}
