use std::collections::{HashMap, HashSet};

use crate::aggregate::{by_desc, group_count, group_distinct, top_n, unordered_pair};
use crate::join::Names;
use crate::report::{name_of, Outcome, Report};
use crate::resolve;
use crate::store::Tables;

pub fn matches(title: &str, tables: &Tables, query: &str) -> Outcome {
	let umpire = resolve::umpire(tables, query)?;
	let judged = tables.umpire_matches.iter().filter(|um| um.officiated_by(umpire)).count();

	Ok(Report::new(
		title,
		vec![
			format!("Umpire Name: {}", name_of(&tables.umpires, umpire)),
			format!("Total number of matches judged by the umpire: {judged}"),
		],
	))
}

/// Umpire pairs by number of matches officiated together; `(a, b)` and `(b, a)` are one pair.
pub fn frequent_pairs(tables: &Tables, n: usize) -> Vec<((i64, i64), usize)> {
	let pairs = group_count(
		tables
			.umpire_matches
			.iter()
			.filter_map(|um| Some(unordered_pair(um.umpire_id1?, um.umpire_id2?))),
		|pair| *pair,
	);
	top_n(pairs, n, |a, b| by_desc(a.1, b.1))
}

pub fn pairings(title: &str, tables: &Tables) -> Report {
	let umpires = Names::of(&tables.umpires);
	let lines = frequent_pairs(tables, 10)
		.into_iter()
		.map(|((a, b), n)| format!("{} & {}: {n} matches", umpires.label(a), umpires.label(b)))
		.collect();
	Report::or_no_data(title, lines, "Umpire-match data not available.")
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinShare {
	pub team: i64,
	pub wins: usize,
	pub matches: usize,
	pub percent: f64,
}

/// Win percentage of every team that played in a match the umpire officiated.
pub fn win_shares(tables: &Tables, umpire: i64) -> Vec<WinShare> {
	let officiated: HashSet<i64> = tables
		.umpire_matches
		.iter()
		.filter(|um| um.officiated_by(umpire))
		.map(|um| um.match_id)
		.collect();

	let wins: HashMap<i64, usize> = group_count(
		tables
			.results
			.iter()
			.filter(|r| officiated.contains(&r.match_id))
			.filter_map(|r| r.winner_id),
		|team| *team,
	)
	.into_iter()
	.collect();

	let appearances = group_distinct(
		tables
			.match_teams
			.iter()
			.filter(|mt| officiated.contains(&mt.match_id))
			.flat_map(|mt| [(mt.team_id1, mt.match_id), (mt.team_id2, mt.match_id)]),
		|(team, _)| *team,
		|(_, match_id)| *match_id,
	);

	appearances
		.into_iter()
		.map(|(team, matches)| {
			let wins = wins.get(&team).copied().unwrap_or_default();
			WinShare {
				team,
				wins,
				matches,
				percent: wins as f64 / matches as f64 * 100.0,
			}
		})
		.collect()
}

pub fn win_bias(title: &str, tables: &Tables, query: &str) -> Outcome {
	let umpire = resolve::umpire(tables, query)?;
	let shares = win_shares(tables, umpire);
	if shares.is_empty() {
		return Ok(Report::no_data(title, "No matches found for this umpire."));
	}

	let mut lines = vec![format!(
		"Win % for teams in matches officiated by {}:",
		name_of(&tables.umpires, umpire)
	)];
	lines.extend(top_n(shares, 15, |a, b| by_desc(a.percent, b.percent)).into_iter().map(|s| {
		format!(
			"{}: {:.2}% ({}/{})",
			name_of(&tables.teams, s.team),
			s.percent,
			s.wins,
			s.matches
		)
	}));
	Ok(Report::new(title, lines))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::data::UmpireMatch;
	use crate::fixture;
	use crate::report::Body;

	#[test]
	fn counts_either_umpire_slot() {
		let tables = fixture::tables();
		let report = matches("Umpire", &tables, "ravi").unwrap();
		assert_eq!(report.lines()[1], "Total number of matches judged by the umpire: 3");

		let menon = matches("Umpire", &tables, "N Menon").unwrap();
		assert_eq!(menon.lines()[1], "Total number of matches judged by the umpire: 1");
	}

	#[test]
	fn pairs_ignore_slot_order() {
		let tables = fixture::tables();
		assert_eq!(frequent_pairs(&tables, 10), vec![((1, 2), 2), ((1, 3), 1)]);
		assert_eq!(
			pairings("Pairs", &tables).lines(),
			["S Ravi & A Dar: 2 matches", "S Ravi & N Menon: 1 matches"]
		);
	}

	#[test]
	fn pairs_skip_a_missing_umpire() {
		let mut tables = fixture::tables();
		tables.umpire_matches.push(UmpireMatch { match_id: 4, umpire_id1: Some(2), umpire_id2: None });
		assert_eq!(frequent_pairs(&tables, 10).len(), 2);
	}

	#[test]
	fn win_bias_under_one_umpire() {
		let tables = fixture::tables();
		let report = win_bias("Bias", &tables, "Menon").unwrap();
		assert_eq!(
			report.lines(),
			[
				"Win % for teams in matches officiated by N Menon:",
				"Mumbai: 100.00% (1/1)",
				"Chennai: 0.00% (0/1)",
			]
		);

		let ravi = win_bias("Bias", &tables, "S Ravi").unwrap();
		assert_eq!(ravi.lines()[1], "Mumbai: 66.67% (2/3)");
	}

	#[test]
	fn umpire_without_matches_is_no_data() {
		let mut tables = fixture::tables();
		tables.umpire_matches.clear();
		let report = win_bias("Bias", &tables, "Dar").unwrap();
		assert!(matches!(report.body, Body::NoData(_)));
	}
}
