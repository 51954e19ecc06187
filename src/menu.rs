//! The interactive selection loop and the text rendering of reports.

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::error::Result;
use crate::report::{Body, Choice, Inputs, Outcome};
use crate::store::Workspace;

pub const EXIT: u32 = 35;

/// Runs `choice` against the workspace, returning the outcome and how long it took.
pub fn timed(ws: &mut Workspace, choice: Choice, inputs: &[String]) -> (Outcome, Duration) {
	let start = Instant::now();
	let outcome = choice.run(ws, Inputs::new(inputs));
	(outcome, start.elapsed())
}

pub fn render(out: &mut dyn Write, outcome: &Outcome, elapsed: Duration) -> Result<()> {
	match outcome {
		Ok(report) => {
			writeln!(out, "{}", report.title)?;
			if let Body::NoData(message) = &report.body {
				writeln!(out, "{message}")?;
			}
			for line in report.lines() {
				writeln!(out, "{line}")?;
			}
		}
		Err(e) => writeln!(out, "{e}")?,
	}

	writeln!(out, "\nTime taken: {:.4} seconds\n", elapsed.as_secs_f64())?;
	Ok(())
}

fn print_menu(prompt: &mut dyn Write) -> Result<()> {
	writeln!(prompt, "\nMenu:")?;
	for choice in Choice::ALL {
		writeln!(prompt, "{} - {}", choice.number(), choice.title())?;
	}
	writeln!(prompt, "{EXIT} - Exit")?;
	write!(prompt, "Enter your choice: ")?;
	prompt.flush()?;
	Ok(())
}

/// One trimmed line, or `None` at end of input.
fn read_line(input: &mut dyn BufRead) -> Result<Option<String>> {
	let mut line = String::new();
	if input.read_line(&mut line)? == 0 {
		return Ok(None);
	}
	Ok(Some(line.trim().to_string()))
}

/// Reads selections until the exit choice or end of input. Prompts go to `prompt`,
/// rendered reports to `out`.
pub fn run(
	ws: &mut Workspace,
	input: &mut dyn BufRead,
	prompt: &mut dyn Write,
	out: &mut dyn Write,
) -> Result<()> {
	loop {
		print_menu(prompt)?;
		let Some(selection) = read_line(input)? else {
			break;
		};

		let choice = match selection.parse::<u32>() {
			Ok(EXIT) => break,
			Ok(n) => Choice::from_number(n),
			Err(_) => None,
		};
		let Some(choice) = choice else {
			warn!("Rejected menu selection '{selection}'");
			writeln!(prompt, "Invalid choice! Please try again.")?;
			continue;
		};

		let mut inputs = Vec::with_capacity(choice.prompts().len());
		for text in choice.prompts() {
			write!(prompt, "{text}")?;
			prompt.flush()?;
			inputs.push(read_line(input)?.unwrap_or_default());
		}

		let (outcome, elapsed) = timed(ws, choice, &inputs);
		if let Err(e) = &outcome {
			warn!("{:?} failed: {e}", choice);
		}
		render(out, &outcome, elapsed)?;
		out.flush()?;
	}

	info!("Exiting the menu");
	writeln!(prompt, "Goodbye!")?;
	Ok(())
}
