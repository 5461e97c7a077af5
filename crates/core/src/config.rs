use std::path::PathBuf;

use chrono_tz::Tz;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;
pub const DEFAULT_REMINDER_MINUTES: u32 = 15;

/// Settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Saved schedule page; stdin when `None`.
	pub input: Option<PathBuf>,
	/// Calendar file to write; the caller prints the calendar when `None`.
	pub output: Option<PathBuf>,
	/// Zone the page's wall-clock times are in.
	pub timezone: Tz,
	pub include_reminder: bool,
	pub reminder_minutes: u32,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			input: None,
			output: None,
			timezone: DEFAULT_TIMEZONE,
			include_reminder: true,
			reminder_minutes: DEFAULT_REMINDER_MINUTES,
		}
	}
}
