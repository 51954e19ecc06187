use crate::data::Named;
use crate::join::match_sheets;
use crate::report::Report;
use crate::store::Tables;

pub fn names<T: Named>(title: &str, rows: &[T], label: &str) -> Report {
	let mut lines: Vec<String> = rows
		.iter()
		.enumerate()
		.map(|(i, row)| format!("{}. {}", i + 1, row.name()))
		.collect();

	if lines.is_empty() {
		return Report::no_data(title, format!("No {label}s found."));
	}

	lines.push(format!("Total number of {label}s: {}", rows.len()));
	Report::new(title, lines)
}

pub fn matches(title: &str, tables: &Tables) -> Report {
	let show = |name: Option<&str>| name.unwrap_or("-").to_string();

	let rows: Vec<String> = match_sheets(tables)
		.into_iter()
		.map(|sheet| {
			format!(
				"{} | {} | {} | {} | {} | {} | {} | {} | {} | {}",
				sheet.game.match_id,
				sheet.game.season,
				sheet.game.date,
				show(sheet.venue),
				show(sheet.teams.first),
				show(sheet.teams.second),
				show(sheet.umpires.first),
				show(sheet.umpires.second),
				show(sheet.winner),
				show(sheet.player_of_match),
			)
		})
		.collect();

	if rows.is_empty() {
		return Report::no_data(title, "No matches found.");
	}

	let mut lines = vec![
		"Match ID | Season | Date | Venue | Team 1 | Team 2 | Umpire 1 | Umpire 2 | Winner | Player of the Match"
			.to_string(),
	];
	lines.extend(rows);
	Report::new(title, lines)
}
