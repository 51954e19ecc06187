/// Predicate over season values built from free-form user input.
///
/// Blank input selects every season, an all-digit year matches any season
/// containing it (`2017` matches `2017/18`), and anything else must match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonFilter {
	All,
	Contains(String),
	Exact(String),
}

impl SeasonFilter {
	pub fn parse(input: &str) -> Self {
		let input = input.trim();
		if input.is_empty() {
			SeasonFilter::All
		} else if input.chars().all(|c| c.is_ascii_digit()) {
			SeasonFilter::Contains(input.to_string())
		} else {
			SeasonFilter::Exact(input.to_string())
		}
	}

	/// Rows with no known season only pass the select-all filter.
	pub fn matches(&self, season: Option<&str>) -> bool {
		match (self, season) {
			(SeasonFilter::All, _) => true,
			(_, None) => false,
			(SeasonFilter::Contains(year), Some(season)) => season.contains(year.as_str()),
			(SeasonFilter::Exact(wanted), Some(season)) => season == wanted,
		}
	}

	pub fn label(&self) -> &str {
		match self {
			SeasonFilter::All => "ALL",
			SeasonFilter::Contains(s) | SeasonFilter::Exact(s) => s,
		}
	}
}
