#![warn(clippy::pedantic)]

use std::{
	io::{self, Write},
	path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use cu2ics_core::{
	course::CourseMeeting, Config, Outcome, Progress, Report, Tz, DEFAULT_REMINDER_MINUTES,
	DEFAULT_TIMEZONE,
};
use tracing_subscriber::EnvFilter;

/// Upper bound on sessions listed per event by `--list`.
const LIST_LIMIT: u16 = 200;

#[derive(Parser)]
#[command(name = "cu2ics", version, about = "Convert a saved class schedule page to an iCalendar file")]
struct Args {
	/// Saved "My Class Schedule" page; reads stdin when omitted or `-`
	#[clap(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
	path: Option<PathBuf>,
	/// Calendar file to write; writes to stdout when omitted
	#[clap(short, long, value_hint = clap::ValueHint::FilePath)]
	output: Option<PathBuf>,
	/// Time zone the schedule's times are in
	#[clap(long, default_value = DEFAULT_TIMEZONE.name())]
	timezone: Tz,
	/// Leave the reminder alarm out of every event
	#[clap(long)]
	no_reminder: bool,
	/// How long before each class the reminder fires
	#[clap(long, value_name = "MINUTES", default_value_t = DEFAULT_REMINDER_MINUTES)]
	reminder_minutes: u32,
	/// Print the date of every class instead of the calendar
	#[clap(long, conflicts_with = "output")]
	list: bool,
	/// More log output (-v info, -vv debug); RUST_LOG overrides
	#[clap(short, long, action = ArgAction::Count)]
	verbose: u8,
}

impl From<&Args> for Config {
	fn from(args: &Args) -> Self {
		Self {
			input: args.path.clone().filter(|path| path.as_os_str() != "-"),
			output: args.output.clone(),
			timezone: args.timezone,
			include_reminder: !args.no_reminder,
			reminder_minutes: args.reminder_minutes,
		}
	}
}

/// Logs generation progress.
#[derive(Default)]
struct LogProgress {
	total: usize,
	done: usize,
}

impl Progress for LogProgress {
	fn start(&mut self, total: usize) {
		self.total = total;
		tracing::info!(meetings = total, "generating calendar file");
	}

	fn meeting(&mut self, meeting: &CourseMeeting, outcome: Outcome) {
		self.done += 1;
		tracing::debug!(
			done = self.done,
			total = self.total,
			class = %meeting.class_number,
			?outcome,
			"meeting processed"
		);
	}

	fn finish(&mut self) {
		tracing::info!("done");
	}
}

fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.with_target(false)
		.init();
}

fn print_sessions(report: &Report, out: &mut impl Write) -> Result<()> {
	for event in report.calendar.events() {
		let sessions = event
			.occurrences(LIST_LIMIT)
			.with_context(|| format!("cannot expand the schedule of {}", event.summary))?;

		for start in sessions {
			writeln!(
				out,
				"{}  {}  {}",
				start.format("%a %Y-%m-%d %H:%M"),
				event.summary,
				event.location
			)?;
		}
	}

	Ok(())
}

fn main() -> Result<()> {
	let args = Args::parse();

	init_logging(args.verbose);

	let config = Config::from(&args);
	let report = cu2ics_core::run(&config, &mut LogProgress::default())
		.context("failed to convert class schedule")?;

	let mut stdout = io::stdout().lock();

	if args.list {
		print_sessions(&report, &mut stdout)?;
	} else if config.output.is_none() {
		write!(stdout, "{}", report.calendar).context("cannot write calendar to stdout")?;
	}

	stdout.flush()?;

	if report.failed > 0 {
		tracing::warn!(skipped = report.failed, "some meetings could not be converted");
	}

	Ok(())
}
