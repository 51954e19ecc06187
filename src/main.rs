mod aggregate;
mod cli;
mod data;
mod error;
#[cfg(test)]
mod fixture;
mod join;
mod menu;
mod report;
mod resolve;
mod season;
mod store;

use std::{
	fs::File,
	io::{self, Write},
	path::Path,
};

use clap::Parser;
use cli::{Cli, Commands};
use env_logger::Env;
use error::Result;
use log::info;
use report::Choice;
use store::{db::SqliteStorage, files::CsvStorage, Storage, Workspace};

/// The SQLite file when one is given, else the CSV directory.
fn backend(data_dir: &Path, database: Option<&Path>) -> Result<Box<dyn Storage>> {
	let storage: Box<dyn Storage> = match database {
		Some(path) => {
			info!("Reading tables from database {}", path.display());
			Box::new(SqliteStorage::open(path)?)
		}
		None => {
			info!("Reading tables from {}", data_dir.display());
			Box::new(CsvStorage::new(data_dir))
		}
	};

	Ok(storage)
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	let level = if cli.verbose { "debug" } else { "info" };
	env_logger::Builder::from_env(Env::default().default_filter_or(level))
		.format_timestamp(None)
		.init();

	let mut out = match cli.output.as_deref() {
		Some(path) => Box::new(File::create(path)?) as Box<dyn Write>,
		None => Box::new(io::stdout()) as Box<dyn Write>,
	};

	match cli.command.unwrap_or(Commands::Menu) {
		Commands::Menu => {
			let mut ws = Workspace::open(backend(&cli.data_dir, cli.database.as_deref())?)?;
			let stdin = io::stdin();
			menu::run(&mut ws, &mut stdin.lock(), &mut io::stdout(), &mut out)?;
		}
		Commands::Run { choice, inputs } => {
			let mut ws = Workspace::open(backend(&cli.data_dir, cli.database.as_deref())?)?;
			// The parser limits the range, so this only misses on an unknown number.
			if let Some(choice) = Choice::from_number(choice) {
				let (outcome, elapsed) = menu::timed(&mut ws, choice, &inputs);
				menu::render(&mut out, &outcome, elapsed)?;
			}
		}
		Commands::Import { database } => {
			let tables = CsvStorage::new(&cli.data_dir).load()?;
			tables.log_summary();
			SqliteStorage::open(&database)?.import(&tables)?;
			info!("Imported tables into {}", database.display());
		}
		Commands::Export { dir } => {
			let tables = backend(&cli.data_dir, cli.database.as_deref())?.load()?;
			let target = CsvStorage::new(dir);
			target.write_all(&tables)?;
			writeln!(out, "Exported {} deliveries to {}", tables.deliveries.len(), target.dir().display())?;
		}
	}

	out.flush()?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn csv_backend_leaves_the_database_path_alone() {
		let dir = tempfile::tempdir().unwrap();
		let database = dir.path().join("league.db");

		backend(dir.path(), None).unwrap();
		assert!(!database.exists());

		backend(dir.path(), Some(&database)).unwrap();
		assert!(database.exists());
	}
}
