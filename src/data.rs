use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// A table as it is laid out in storage: file stem and the columns a load requires.
pub trait Table {
	const NAME: &'static str;
	const COLUMNS: &'static [&'static str];
}

/// Rows with a user-facing name that the resolver can search.
pub trait Named {
	fn id(&self) -> i64;
	fn name(&self) -> &str;
	fn set_name(&mut self, name: String);
}

macro_rules! named_table {
	($ty:ident, $table:literal, $id:literal, $name:literal) => {
		#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
		pub struct $ty {
			#[serde(rename = $id)]
			pub id: i64,
			#[serde(rename = $name, default)]
			pub name: String,
		}

		impl Table for $ty {
			const NAME: &'static str = $table;
			const COLUMNS: &'static [&'static str] = &[$id, $name];
		}

		impl Named for $ty {
			fn id(&self) -> i64 {
				self.id
			}

			fn name(&self) -> &str {
				&self.name
			}

			fn set_name(&mut self, name: String) {
				self.name = name;
			}
		}
	};
}

named_table!(Team, "teams", "team_id", "team");
named_table!(Player, "players", "player_id", "player");
named_table!(Venue, "venue", "venue_id", "venue");
named_table!(Umpire, "umpire", "umpire_id", "umpire");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
	pub match_id: i64,
	#[serde(default)]
	pub season: String,
	#[serde(default)]
	pub date: String,
	#[serde(default, deserialize_with = "lenient_id")]
	pub venue_id: Option<i64>,
	#[serde(default)]
	pub match_type: String,
}

impl Table for Match {
	const NAME: &'static str = "match";
	const COLUMNS: &'static [&'static str] = &["match_id", "season", "date", "venue_id", "match_type"];
}

pub const PLAYOFF_APPEARANCE_STAGES: &[&str] = &["qualifier", "eliminator", "final"];
pub const PLAYOFF_STAGES: &[&str] = &["qualifier", "eliminator", "final", "semi"];

impl Match {
	pub fn season(&self) -> Option<&str> {
		let season = self.season.trim();
		(!season.is_empty()).then_some(season)
	}

	/// Case-insensitive substring test of the match type against any of `stages`.
	pub fn is_stage(&self, stages: &[&str]) -> bool {
		let kind = self.match_type.to_lowercase();
		stages.iter().any(|stage| kind.contains(stage))
	}

	pub fn played_on(&self) -> Option<NaiveDate> {
		parse_date(&self.date)
	}
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%d %B %Y", "%B %d, %Y"];

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
	let raw = raw.trim();
	if raw.is_empty() {
		return None;
	}

	DATE_FORMATS
		.iter()
		.find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
		.or_else(|| {
			NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
				.ok()
				.map(|dt| dt.date())
		})
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchTeams {
	pub match_id: i64,
	pub team_id1: i64,
	pub team_id2: i64,
}

impl Table for MatchTeams {
	const NAME: &'static str = "match_teams";
	const COLUMNS: &'static [&'static str] = &["match_id", "team_id1", "team_id2"];
}

impl MatchTeams {
	pub fn involves(&self, team: i64) -> bool {
		self.team_id1 == team || self.team_id2 == team
	}

	pub fn opponent_of(&self, team: i64) -> i64 {
		if self.team_id1 == team {
			self.team_id2
		} else {
			self.team_id1
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
	pub match_id: i64,
	#[serde(default, deserialize_with = "lenient_id")]
	pub winner_id: Option<i64>,
}

impl Table for MatchResult {
	const NAME: &'static str = "match_result";
	const COLUMNS: &'static [&'static str] = &["match_id", "winner_id"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TossDecision {
	Bat,
	Field,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toss {
	pub match_id: i64,
	#[serde(default, deserialize_with = "lenient_id")]
	pub team_id: Option<i64>,
	#[serde(default, deserialize_with = "lenient_id")]
	pub toss_winner: Option<i64>,
	#[serde(default)]
	pub toss_decision: String,
}

impl Table for Toss {
	const NAME: &'static str = "toss";
	const COLUMNS: &'static [&'static str] = &["match_id", "toss_winner", "toss_decision"];
}

impl Toss {
	pub fn decision(&self) -> Option<TossDecision> {
		match self.toss_decision.trim().to_lowercase().as_str() {
			"bat" => Some(TossDecision::Bat),
			"field" => Some(TossDecision::Field),
			_ => None,
		}
	}
}

/// Composite key of a single ball: `(match_id, inning, over, ball)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BallKey {
	pub match_id: i64,
	pub inning: i64,
	pub over: i64,
	pub ball: i64,
}

pub const POWERPLAY_OVERS: i64 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
	pub match_id: i64,
	pub inning: i64,
	pub over: i64,
	pub ball: i64,
	pub batter_id: i64,
	pub bowler_id: i64,
	pub non_striker_id: i64,
	pub batting_team_id: i64,
	pub bowling_team_id: i64,
	pub batsman_runs: i64,
	pub total_runs: i64,
}

impl Table for Delivery {
	const NAME: &'static str = "delivery";
	const COLUMNS: &'static [&'static str] = &[
		"match_id",
		"inning",
		"over",
		"ball",
		"batter_id",
		"bowler_id",
		"non_striker_id",
		"batting_team_id",
		"bowling_team_id",
		"batsman_runs",
		"total_runs",
	];
}

impl Delivery {
	pub fn key(&self) -> BallKey {
		BallKey {
			match_id: self.match_id,
			inning: self.inning,
			over: self.over,
			ball: self.ball,
		}
	}

	pub fn in_powerplay(&self) -> bool {
		self.over < POWERPLAY_OVERS
	}

	pub fn is_four(&self) -> bool {
		self.batsman_runs == 4
	}

	pub fn is_six(&self) -> bool {
		self.batsman_runs == 6
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dismissal {
	pub match_id: i64,
	pub inning: i64,
	pub over: i64,
	pub ball: i64,
	#[serde(default)]
	pub dismissal_kind: String,
	#[serde(default, deserialize_with = "lenient_id")]
	pub fielder_id: Option<i64>,
}

impl Table for Dismissal {
	const NAME: &'static str = "dismissals";
	const COLUMNS: &'static [&'static str] = &["match_id", "inning", "over", "ball", "dismissal_kind", "fielder_id"];
}

impl Dismissal {
	pub fn key(&self) -> BallKey {
		BallKey {
			match_id: self.match_id,
			inning: self.inning,
			over: self.over,
			ball: self.ball,
		}
	}

	pub fn is_catch_by(&self, player: i64) -> bool {
		self.dismissal_kind == "caught" && self.fielder_id == Some(player)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerOfMatch {
	pub match_id: i64,
	#[serde(default, deserialize_with = "lenient_id")]
	pub player_of_the_match_id: Option<i64>,
}

impl Table for PlayerOfMatch {
	const NAME: &'static str = "player_of_the_match";
	const COLUMNS: &'static [&'static str] = &["match_id", "player_of_the_match_id"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UmpireMatch {
	pub match_id: i64,
	#[serde(default, deserialize_with = "lenient_id")]
	pub umpire_id1: Option<i64>,
	#[serde(default, deserialize_with = "lenient_id")]
	pub umpire_id2: Option<i64>,
}

impl Table for UmpireMatch {
	const NAME: &'static str = "umpire_match";
	const COLUMNS: &'static [&'static str] = &["match_id", "umpire_id1", "umpire_id2"];
}

impl UmpireMatch {
	pub fn officiated_by(&self, umpire: i64) -> bool {
		self.umpire_id1 == Some(umpire) || self.umpire_id2 == Some(umpire)
	}
}

/// Parses an identifier cell, accepting float renderings such as `12.0`.
pub fn parse_id(raw: &str) -> Option<i64> {
	let raw = raw.trim();
	if raw.is_empty() {
		return None;
	}

	raw.parse::<i64>().ok().or_else(|| {
		raw.parse::<f64>()
			.ok()
			.filter(|v| v.is_finite() && v.fract() == 0.0)
			.map(|v| v as i64)
	})
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw: Option<String> = Option::deserialize(deserializer)?;
	Ok(raw.as_deref().and_then(parse_id))
}
