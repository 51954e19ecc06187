//! The numbered reports offered by the menu.
//!
//! Every report resolves its inputs, runs a fixed join/aggregate pipeline over the
//! tables and returns printable lines. Unknown names come back as a [`QueryError`];
//! a valid query that selects nothing is a [`Body::NoData`] report, not an error.

mod listing;
mod playoff;
mod player;
mod seasons;
mod team;
mod umpire;
mod venue;

use log::warn;

use crate::data::Named;
use crate::error::QueryError;
use crate::store::Workspace;

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
	Lines(Vec<String>),
	NoData(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
	pub title: String,
	pub body: Body,
}

impl Report {
	pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
		Self {
			title: title.into(),
			body: Body::Lines(lines),
		}
	}

	pub fn no_data(title: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			body: Body::NoData(message.into()),
		}
	}

	/// `lines` as the body, or `message` when there are none.
	pub fn or_no_data(title: impl Into<String>, lines: Vec<String>, message: impl Into<String>) -> Self {
		if lines.is_empty() {
			Self::no_data(title, message)
		} else {
			Self::new(title, lines)
		}
	}

	pub fn lines(&self) -> &[String] {
		match &self.body {
			Body::Lines(lines) => lines,
			Body::NoData(_) => &[],
		}
	}
}

pub type Outcome = Result<Report, QueryError>;

/// Values typed at a report's prompts, in prompt order. Missing values read as blank.
#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
	values: &'a [String],
}

impl<'a> Inputs<'a> {
	pub fn new(values: &'a [String]) -> Self {
		Self { values }
	}

	pub fn text(&self, i: usize) -> &'a str {
		self.values.get(i).map_or("", |v| v.trim())
	}

	/// A non-negative threshold; blank or unparseable input falls back to `default`.
	pub fn count_or(&self, i: usize, default: usize) -> usize {
		let raw = self.text(i);
		if raw.is_empty() {
			return default;
		}
		raw.parse().unwrap_or_else(|_| {
			warn!("Ignoring threshold '{raw}', using {default}");
			default
		})
	}
}

pub(crate) fn name_of<T: Named>(rows: &[T], id: i64) -> String {
	rows.iter()
		.find(|row| row.id() == id)
		.map_or_else(|| format!("id:{id}"), |row| row.name().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
	Teams = 1,
	Players,
	Umpires,
	Venues,
	Matches,
	PlayerStats,
	PlayerOfMatch,
	HeadToHead,
	TeamHistory,
	VenueResults,
	VenueFirstInnings,
	Boundaries,
	PowerplayScore,
	PowerplayWickets,
	SeasonAwards,
	UmpireMatches,
	Milestones,
	FiveWicketHauls,
	BowlerVsBatter,
	RenameTeam,
	RenameVenue,
	TeamMatches,
	TopScorers,
	Economy,
	StrikeRates,
	BestSeason,
	SeasonForm,
	Partnerships,
	UmpirePairs,
	UmpireBias,
	HighestScoring,
	PlayoffTeams,
	FinalsWinners,
	PlayoffAwards,
}

const PLAYER: &str = "Enter the name of the player: ";
const TEAM: &str = "Enter the name of the team: ";
const VENUE: &str = "Enter the name of the venue: ";
const UMPIRE: &str = "Enter the name of the umpire: ";
const SEASON: &str = "Enter season (e.g. 2017 or 2017/18) or press Enter for ALL: ";

impl Choice {
	pub const ALL: [Choice; 34] = [
		Choice::Teams,
		Choice::Players,
		Choice::Umpires,
		Choice::Venues,
		Choice::Matches,
		Choice::PlayerStats,
		Choice::PlayerOfMatch,
		Choice::HeadToHead,
		Choice::TeamHistory,
		Choice::VenueResults,
		Choice::VenueFirstInnings,
		Choice::Boundaries,
		Choice::PowerplayScore,
		Choice::PowerplayWickets,
		Choice::SeasonAwards,
		Choice::UmpireMatches,
		Choice::Milestones,
		Choice::FiveWicketHauls,
		Choice::BowlerVsBatter,
		Choice::RenameTeam,
		Choice::RenameVenue,
		Choice::TeamMatches,
		Choice::TopScorers,
		Choice::Economy,
		Choice::StrikeRates,
		Choice::BestSeason,
		Choice::SeasonForm,
		Choice::Partnerships,
		Choice::UmpirePairs,
		Choice::UmpireBias,
		Choice::HighestScoring,
		Choice::PlayoffTeams,
		Choice::FinalsWinners,
		Choice::PlayoffAwards,
	];

	pub fn from_number(n: u32) -> Option<Self> {
		Self::ALL.iter().copied().find(|c| c.number() == n)
	}

	pub fn number(self) -> u32 {
		self as u32
	}

	pub fn title(self) -> &'static str {
		match self {
			Choice::Teams => "List of all teams",
			Choice::Players => "List of all players",
			Choice::Umpires => "List of all umpires",
			Choice::Venues => "List of all venues",
			Choice::Matches => "List of all matches and all information about them",
			Choice::PlayerStats => "Particular player stats",
			Choice::PlayerOfMatch => "How many times a player became player of the match and in which matches",
			Choice::HeadToHead => "Head to head stats of any 2 teams",
			Choice::TeamHistory => "Player team history (which team in which season)",
			Choice::VenueResults => "For a given stadium, wins batting first and batting second",
			Choice::VenueFirstInnings => "For a given stadium, average first innings score",
			Choice::Boundaries => "Total number of 4s and 6s per season",
			Choice::PowerplayScore => "Average powerplay score of a team for each season",
			Choice::PowerplayWickets => "Average wickets taken in powerplay by a team for each season",
			Choice::SeasonAwards => "Season awards - orange cap, purple cap, most 4s, 6s, dot balls, winner, runner up",
			Choice::UmpireMatches => "Number of matches judged by a particular umpire",
			Choice::Milestones => "Most hundreds and fifties per season",
			Choice::FiveWicketHauls => "Most 5 wicket hauls per season",
			Choice::BowlerVsBatter => "Bowler vs batter comparison",
			Choice::RenameTeam => "Update team name",
			Choice::RenameVenue => "Update venue name",
			Choice::TeamMatches => "Matches per season for a team",
			Choice::TopScorers => "Top run-scorers in a season",
			Choice::Economy => "Most economical bowlers in a season",
			Choice::StrikeRates => "Best strike rates for a team in a season",
			Choice::BestSeason => "Player's best season (highest runs/wickets)",
			Choice::SeasonForm => "Player strike rate & average per season",
			Choice::Partnerships => "Highest partnerships per season",
			Choice::UmpirePairs => "Most frequent umpire pairings",
			Choice::UmpireBias => "Umpire win bias (team win % under a specific umpire)",
			Choice::HighestScoring => "Top 10 highest scoring matches in a season",
			Choice::PlayoffTeams => "Teams with most playoff appearances",
			Choice::FinalsWinners => "Finals winners by season",
			Choice::PlayoffAwards => "Player of the match in playoff games",
		}
	}

	pub fn prompts(self) -> &'static [&'static str] {
		match self {
			Choice::PlayerStats
			| Choice::PlayerOfMatch
			| Choice::TeamHistory
			| Choice::BestSeason
			| Choice::SeasonForm => &[PLAYER],
			Choice::HeadToHead => &["Enter the name of the first team: ", "Enter the name of the second team: "],
			Choice::VenueResults | Choice::VenueFirstInnings => &[VENUE],
			Choice::PowerplayScore | Choice::PowerplayWickets => &[TEAM],
			Choice::SeasonAwards | Choice::TopScorers | Choice::Partnerships | Choice::HighestScoring => &[SEASON],
			Choice::UmpireMatches | Choice::UmpireBias => &[UMPIRE],
			Choice::BowlerVsBatter => &["Enter the name of the bowler: ", "Enter the name of the batter: "],
			Choice::RenameTeam => &["Enter the old name of the team: ", "Enter the new name of the team: "],
			Choice::RenameVenue => &["Enter the old name of the venue: ", "Enter the new name of the venue: "],
			Choice::TeamMatches => &[TEAM, SEASON],
			Choice::Economy => &[SEASON, "Enter minimum balls threshold (press Enter for 100): "],
			Choice::StrikeRates => &[TEAM, SEASON, "Enter minimum balls threshold (press Enter for 60): "],
			Choice::Teams
			| Choice::Players
			| Choice::Umpires
			| Choice::Venues
			| Choice::Matches
			| Choice::Boundaries
			| Choice::Milestones
			| Choice::FiveWicketHauls
			| Choice::UmpirePairs
			| Choice::PlayoffTeams
			| Choice::FinalsWinners
			| Choice::PlayoffAwards => &[],
		}
	}

	pub fn run(self, ws: &mut Workspace, inputs: Inputs<'_>) -> Outcome {
		let title = self.title();
		let t = ws.tables();

		match self {
			Choice::RenameTeam => {
				let (old, new) = (inputs.text(0), inputs.text(1));
				let team = ws.rename_team(old, new)?;
				Ok(Report::new(
					title,
					vec![format!("Team name updated successfully from '{old}' to '{}'.", team.name)],
				))
			}
			Choice::RenameVenue => {
				let (old, new) = (inputs.text(0), inputs.text(1));
				let venue = ws.rename_venue(old, new)?;
				Ok(Report::new(
					title,
					vec![format!("Venue name updated successfully from '{old}' to '{}'.", venue.name)],
				))
			}
			Choice::Teams => Ok(listing::names(title, &t.teams, "team")),
			Choice::Players => Ok(listing::names(title, &t.players, "player")),
			Choice::Umpires => Ok(listing::names(title, &t.umpires, "umpire")),
			Choice::Venues => Ok(listing::names(title, &t.venues, "venue")),
			Choice::Matches => Ok(listing::matches(title, t)),
			Choice::PlayerStats => player::stats(title, t, inputs.text(0)),
			Choice::PlayerOfMatch => player::awards(title, t, inputs.text(0)),
			Choice::HeadToHead => team::head_to_head(title, t, inputs.text(0), inputs.text(1)),
			Choice::TeamHistory => player::team_history(title, t, inputs.text(0)),
			Choice::VenueResults => venue::results(title, t, inputs.text(0)),
			Choice::VenueFirstInnings => venue::first_innings(title, t, inputs.text(0)),
			Choice::Boundaries => Ok(seasons::boundaries(title, t)),
			Choice::PowerplayScore => team::powerplay_score(title, t, inputs.text(0)),
			Choice::PowerplayWickets => team::powerplay_wickets(title, t, inputs.text(0)),
			Choice::SeasonAwards => Ok(seasons::awards(title, t, inputs.text(0))),
			Choice::UmpireMatches => umpire::matches(title, t, inputs.text(0)),
			Choice::Milestones => Ok(seasons::milestones(title, t)),
			Choice::FiveWicketHauls => Ok(seasons::five_wicket_hauls(title, t)),
			Choice::BowlerVsBatter => player::bowler_vs_batter(title, t, inputs.text(0), inputs.text(1)),
			Choice::TeamMatches => team::matches_per_season(title, t, inputs.text(0), inputs.text(1)),
			Choice::TopScorers => Ok(seasons::top_scorers(title, t, inputs.text(0))),
			Choice::Economy => Ok(seasons::economy(title, t, inputs.text(0), inputs.count_or(1, 100))),
			Choice::StrikeRates => {
				team::strike_rates(title, t, inputs.text(0), inputs.text(1), inputs.count_or(2, 60))
			}
			Choice::BestSeason => player::best_season(title, t, inputs.text(0)),
			Choice::SeasonForm => player::season_form(title, t, inputs.text(0)),
			Choice::Partnerships => Ok(seasons::partnerships(title, t, inputs.text(0))),
			Choice::UmpirePairs => Ok(umpire::pairings(title, t)),
			Choice::UmpireBias => umpire::win_bias(title, t, inputs.text(0)),
			Choice::HighestScoring => Ok(seasons::highest_scoring(title, t, inputs.text(0))),
			Choice::PlayoffTeams => Ok(playoff::appearances(title, t)),
			Choice::FinalsWinners => Ok(playoff::finals_winners(title, t)),
			Choice::PlayoffAwards => Ok(playoff::player_of_match(title, t)),
		}
	}
}
