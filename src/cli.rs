use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Season-by-season league reports", long_about = None)]
pub struct Cli {
	/// Directory holding the normalized CSV tables
	#[arg(long, value_name = "DIR", env = "LEAGUE_DATA_DIR", default_value = "normalized csvs")]
	pub data_dir: PathBuf,

	/// Read the tables from a SQLite database instead of the CSV directory
	#[arg(long, value_name = "FILE", env = "LEAGUE_DATABASE")]
	pub database: Option<PathBuf>,

	#[arg(short, long, value_name = "FILE")]
	pub output: Option<PathBuf>,

	#[arg(short, long)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Interactive report menu
	Menu,
	/// Run a single report; INPUTS answer its prompts in order
	Run {
		#[arg(value_parser = clap::value_parser!(u32).range(1..=34))]
		choice: u32,
		inputs: Vec<String>,
	},
	/// Copy the CSV tables into a SQLite database
	Import {
		#[arg(value_name = "FILE")]
		database: PathBuf,
	},
	/// Write the loaded tables out as CSV files
	Export {
		#[arg(value_name = "DIR")]
		dir: PathBuf,
	},
}
