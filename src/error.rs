use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),

	#[error("Database error: {0}")]
	Sqlite(#[from] rusqlite::Error),

	#[error("Table '{table}' is missing required column '{column}'")]
	Schema { table: &'static str, column: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
	Player,
	Team,
	Venue,
	Umpire,
}

impl fmt::Display for EntityKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EntityKind::Player => write!(f, "Player"),
			EntityKind::Team => write!(f, "Team"),
			EntityKind::Venue => write!(f, "Venue"),
			EntityKind::Umpire => write!(f, "Umpire"),
		}
	}
}

/// Failures that stop a single report; the session always continues afterwards.
#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
	#[error("{kind} '{name}' not found. Please check the name.")]
	NotFound { kind: EntityKind, name: String },

	#[error("{0}")]
	Validation(String),

	#[error("Could not save changes: {0}")]
	Storage(String),
}

impl QueryError {
	pub fn not_found(kind: EntityKind, name: &str) -> Self {
		QueryError::NotFound {
			kind,
			name: name.trim().to_string(),
		}
	}
}
