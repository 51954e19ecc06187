//! Name to identifier resolution.
//!
//! Teams, venues and umpires are matched case-insensitively on the exact name
//! first and then on a substring; players only on a substring. The first row in
//! table order wins, so an ambiguous query silently picks the earliest hit.

use crate::data::Named;
use crate::error::{EntityKind, QueryError};
use crate::store::Tables;

fn needle(query: &str) -> Option<String> {
	let query = query.trim();
	(!query.is_empty()).then(|| query.to_lowercase())
}

pub fn exact_position<T: Named>(rows: &[T], query: &str) -> Option<usize> {
	let needle = needle(query)?;
	rows.iter().position(|row| row.name().to_lowercase() == needle)
}

pub fn substring_position<T: Named>(rows: &[T], query: &str) -> Option<usize> {
	let needle = needle(query)?;
	rows.iter().position(|row| row.name().to_lowercase().contains(&needle))
}

fn exact_then_substring<T: Named>(rows: &[T], kind: EntityKind, query: &str) -> Result<i64, QueryError> {
	exact_position(rows, query)
		.or_else(|| substring_position(rows, query))
		.map(|i| rows[i].id())
		.ok_or_else(|| QueryError::not_found(kind, query))
}

pub fn player(tables: &Tables, query: &str) -> Result<i64, QueryError> {
	substring_position(&tables.players, query)
		.map(|i| tables.players[i].id)
		.ok_or_else(|| QueryError::not_found(EntityKind::Player, query))
}

pub fn team(tables: &Tables, query: &str) -> Result<i64, QueryError> {
	exact_then_substring(&tables.teams, EntityKind::Team, query)
}

pub fn venue(tables: &Tables, query: &str) -> Result<i64, QueryError> {
	exact_then_substring(&tables.venues, EntityKind::Venue, query)
}

pub fn umpire(tables: &Tables, query: &str) -> Result<i64, QueryError> {
	exact_then_substring(&tables.umpires, EntityKind::Umpire, query)
}
