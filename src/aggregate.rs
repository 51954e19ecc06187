//! Group, rank and ratio primitives shared by the reports.
//!
//! Groups keep the order in which their keys were first seen, so every "most X"
//! answer is deterministic: on a tie the row encountered first wins.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use crate::data::Match;

#[derive(Debug, Clone)]
pub struct Groups<K, V> {
	index: HashMap<K, usize>,
	groups: Vec<(K, V)>,
}

impl<K, V> Default for Groups<K, V> {
	fn default() -> Self {
		Self {
			index: HashMap::new(),
			groups: Vec::new(),
		}
	}
}

impl<K: Eq + Hash + Clone, V: Default> Groups<K, V> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn entry(&mut self, key: K) -> &mut V {
		let next = self.groups.len();
		let i = *self.index.entry(key.clone()).or_insert(next);
		if i == next {
			self.groups.push((key, V::default()));
		}
		&mut self.groups[i].1
	}

	pub fn is_empty(&self) -> bool {
		self.groups.is_empty()
	}

	pub fn into_vec(self) -> Vec<(K, V)> {
		self.groups
	}
}

pub fn group_sum<T, K>(
	rows: impl IntoIterator<Item = T>,
	key: impl Fn(&T) -> K,
	value: impl Fn(&T) -> i64,
) -> Vec<(K, i64)>
where
	K: Eq + Hash + Clone,
{
	let mut groups = Groups::new();
	for row in rows {
		*groups.entry(key(&row)) += value(&row);
	}
	groups.into_vec()
}

pub fn group_count<T, K>(rows: impl IntoIterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<(K, usize)>
where
	K: Eq + Hash + Clone,
{
	let mut groups = Groups::new();
	for row in rows {
		*groups.entry(key(&row)) += 1;
	}
	groups.into_vec()
}

/// Number of distinct `item` values per group.
pub fn group_distinct<T, K, D>(
	rows: impl IntoIterator<Item = T>,
	key: impl Fn(&T) -> K,
	item: impl Fn(&T) -> D,
) -> Vec<(K, usize)>
where
	K: Eq + Hash + Clone,
	D: Eq + Hash,
{
	let mut groups: Groups<K, HashSet<D>> = Groups::new();
	for row in rows {
		groups.entry(key(&row)).insert(item(&row));
	}
	groups.into_vec().into_iter().map(|(k, set)| (k, set.len())).collect()
}

/// For each partition, the row with the largest metric; ties keep the earlier row.
pub fn argmax_per<T, P, M>(
	rows: impl IntoIterator<Item = T>,
	partition: impl Fn(&T) -> P,
	metric: impl Fn(&T) -> M,
) -> Vec<(P, T)>
where
	P: Eq + Hash + Clone,
	M: PartialOrd,
{
	let mut best: Groups<P, Option<T>> = Groups::new();
	for row in rows {
		let slot = best.entry(partition(&row));
		let replace = match slot.as_ref() {
			Some(current) => metric(&row) > metric(current),
			None => true,
		};
		if replace {
			*slot = Some(row);
		}
	}

	best.into_vec()
		.into_iter()
		.filter_map(|(p, row)| row.map(|row| (p, row)))
		.collect()
}

/// Keeps rows whose count reaches `min` (inclusive).
pub fn at_least<T>(rows: Vec<T>, min: usize, count: impl Fn(&T) -> usize) -> Vec<T> {
	rows.into_iter().filter(|row| count(row) >= min).collect()
}

/// Stable sort by `compare` and keep the first `n`.
pub fn top_n<T>(mut rows: Vec<T>, n: usize, compare: impl FnMut(&T, &T) -> Ordering) -> Vec<T> {
	rows.sort_by(compare);
	rows.truncate(n);
	rows
}

pub fn unordered_pair<T: Ord>(a: T, b: T) -> (T, T) {
	if a <= b {
		(a, b)
	} else {
		(b, a)
	}
}

fn per_balls(runs: i64, balls: usize, scale: f64) -> Option<f64> {
	(balls > 0).then(|| runs as f64 / balls as f64 * scale)
}

/// Runs conceded per six balls.
pub fn economy(runs_conceded: i64, balls: usize) -> Option<f64> {
	per_balls(runs_conceded, balls, 6.0)
}

/// Runs per hundred balls faced.
pub fn strike_rate(runs: i64, balls: usize) -> Option<f64> {
	per_balls(runs, balls, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Average {
	Value(f64),
	NotAvailable,
}

impl fmt::Display for Average {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Average::Value(v) => write!(f, "{v:.2}"),
			Average::NotAvailable => write!(f, "NA"),
		}
	}
}

pub fn batting_average(runs: i64, outs: usize) -> Average {
	if outs == 0 {
		Average::NotAvailable
	} else {
		Average::Value(runs as f64 / outs as f64)
	}
}

/// The season's deciding match among `candidates`: the latest parseable date,
/// or the largest match id when no candidate has a usable date.
pub fn deciding_match<'a>(candidates: &[&'a Match]) -> Option<&'a Match> {
	let dated = argmax_per(
		candidates.iter().filter_map(|m| m.played_on().map(|day| (day, *m))),
		|_| (),
		|(day, _)| *day,
	);

	match dated.into_iter().next() {
		Some((_, (_, game))) => Some(game),
		None => argmax_per(candidates.iter().copied(), |_| (), |m| m.match_id)
			.into_iter()
			.next()
			.map(|(_, game)| game),
	}
}

/// One deciding match per season among matches whose type mentions "final".
pub fn finals_by_season(matches: &[Match]) -> Vec<(&str, &Match)> {
	let mut per_season: Groups<&str, Vec<&Match>> = Groups::new();
	for game in matches.iter().filter(|m| m.is_stage(&["final"])) {
		if let Some(season) = game.season() {
			per_season.entry(season).push(game);
		}
	}

	per_season
		.into_vec()
		.into_iter()
		.filter_map(|(season, candidates)| deciding_match(&candidates).map(|game| (season, game)))
		.collect()
}

pub fn by_desc<M: PartialOrd>(a: M, b: M) -> Ordering {
	b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

pub fn by_asc<M: PartialOrd>(a: M, b: M) -> Ordering {
	a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn game(match_id: i64, season: &str, date: &str, kind: &str) -> Match {
		Match {
			match_id,
			season: season.into(),
			date: date.into(),
			venue_id: None,
			match_type: kind.into(),
		}
	}

	#[test]
	fn group_sum_keeps_first_seen_order() {
		let rows = [("2020", 5), ("2019", 1), ("2020", 2), ("2018", 0)];
		let sums = group_sum(rows, |r| r.0, |r| r.1);
		assert_eq!(sums, vec![("2020", 7), ("2019", 1), ("2018", 0)]);
	}

	#[test]
	fn distinct_counts_ignore_repeats() {
		let rows = [("2020", 1), ("2020", 1), ("2020", 2), ("2019", 3)];
		assert_eq!(group_distinct(rows, |r| r.0, |r| r.1), vec![("2020", 2), ("2019", 1)]);
	}

	#[test]
	fn argmax_tie_goes_to_first_row() {
		let rows = [("2020", 11, 50), ("2020", 12, 70), ("2020", 13, 70), ("2021", 14, 10)];
		for _ in 0..10 {
			let best = argmax_per(rows, |r| r.0, |r| r.2);
			assert_eq!(best, vec![("2020", ("2020", 12, 70)), ("2021", ("2021", 14, 10))]);
		}
	}

	#[test]
	fn threshold_is_inclusive() {
		let rows = vec![(1, 99), (2, 100), (3, 101)];
		let kept = at_least(rows, 100, |r| r.1);
		assert_eq!(kept, vec![(2, 100), (3, 101)]);
	}

	#[test]
	fn top_n_is_stable() {
		let rows = vec![("a", 1.0), ("b", 3.0), ("c", 3.0), ("d", 2.0)];
		let top = top_n(rows, 3, |x, y| by_desc(x.1, y.1));
		assert_eq!(top, vec![("b", 3.0), ("c", 3.0), ("d", 2.0)]);
	}

	#[test]
	fn pairs_are_canonical() {
		assert_eq!(unordered_pair(9, 4), (4, 9));
		assert_eq!(unordered_pair(4, 9), (4, 9));
	}

	#[test]
	fn rates_and_average() {
		assert_eq!(economy(30, 24), Some(7.5));
		assert_eq!(strike_rate(45, 30), Some(150.0));
		assert_eq!(strike_rate(10, 0), None);
		assert_eq!(batting_average(120, 0), Average::NotAvailable);
		assert_eq!(batting_average(120, 0).to_string(), "NA");
		assert_eq!(batting_average(120, 3).to_string(), "40.00");
	}

	#[test]
	fn latest_dated_final_wins() {
		let matches = vec![
			game(10, "2019", "2019-05-10", "Qualifying Final"),
			game(12, "2019", "2019-05-12", "Final"),
			game(11, "2019", "2019-05-11", "Semi Final"),
			game(20, "2019", "2019-04-01", "League"),
		];
		let finals = finals_by_season(&matches);
		assert_eq!(finals.len(), 1);
		assert_eq!(finals[0].1.match_id, 12);
	}

	#[test]
	fn undated_finals_fall_back_to_largest_id() {
		let matches = vec![game(31, "2020", "", "Final"), game(35, "2020", "tbc", "final"), game(33, "2020", "", "FINAL")];
		let finals = finals_by_season(&matches);
		assert_eq!(finals[0].1.match_id, 35);
	}

	#[test]
	fn a_single_dated_final_beats_larger_undated_ids() {
		let matches = vec![game(40, "2021", "2021-10-15", "Final"), game(41, "2021", "", "Final")];
		assert_eq!(finals_by_season(&matches)[0].1.match_id, 40);
	}
}
