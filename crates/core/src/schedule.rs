//! Parsing of the "Days & Times" and "Start/End Date" cells.

use std::{fmt, str::FromStr, sync::OnceLock};

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use regex::Regex;

use crate::error::ScheduleError;

const TIME_FORMAT: &str = "%I:%M%p";
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Weekday codes used by the schedule page and their days.
const WEEKDAYS: [(&str, Weekday); 7] = [
	("Mo", Weekday::Mon),
	("Tu", Weekday::Tue),
	("We", Weekday::Wed),
	("Th", Weekday::Thu),
	("Fr", Weekday::Fri),
	("Sa", Weekday::Sat),
	("Su", Weekday::Sun),
];

fn pattern() -> &'static Regex {
	static PATTERN: OnceLock<Regex> = OnceLock::new();

	PATTERN.get_or_init(|| {
		Regex::new(r"^([A-Za-z]+) (\d{1,2}:\d{2}[AP]M) - (\d{1,2}:\d{2}[AP]M)")
			.expect("meeting pattern regex is valid")
	})
}

/// A parsed meeting pattern such as `MoWeFr 10:00AM - 10:50AM`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
	/// Two-letter day tokens in the order they were listed.
	pub days: Vec<String>,
	pub start: String,
	pub end: String,
}

impl FromStr for Schedule {
	type Err = ScheduleError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let captures = pattern()
			.captures(s)
			.ok_or_else(|| ScheduleError::Format(s.to_string()))?;

		let days = captures[1]
			.chars()
			.collect::<Vec<_>>()
			.chunks(2)
			.map(|chunk| chunk.iter().collect())
			.collect();

		Ok(Self {
			days,
			start: captures[2].to_string(),
			end: captures[3].to_string(),
		})
	}
}

impl fmt::Display for Schedule {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} {} - {}", self.days.concat(), self.start, self.end)
	}
}

impl Schedule {
	/// # Errors
	/// [`ScheduleError::Time`] if the start time is not a valid clock time.
	pub fn start_time(&self) -> Result<NaiveTime, ScheduleError> {
		parse_time(&self.start)
	}

	/// # Errors
	/// [`ScheduleError::Time`] if the end time is not a valid clock time.
	pub fn end_time(&self) -> Result<NaiveTime, ScheduleError> {
		parse_time(&self.end)
	}

	/// The meeting days, Monday first and without repeats.
	///
	/// # Errors
	/// [`ScheduleError::UnknownWeekday`] for a token that names no weekday.
	pub fn weekdays(&self) -> Result<Vec<Weekday>, ScheduleError> {
		let mut weekdays = self
			.days
			.iter()
			.map(|code| parse_weekday(code))
			.collect::<Result<Vec<_>, _>>()?;

		weekdays.sort_by_key(Weekday::num_days_from_monday);
		weekdays.dedup();

		Ok(weekdays)
	}
}

fn parse_time(s: &str) -> Result<NaiveTime, ScheduleError> {
	NaiveTime::parse_from_str(s, TIME_FORMAT).map_err(|_| ScheduleError::Time(s.to_string()))
}

/// # Errors
/// [`ScheduleError::UnknownWeekday`] if `code` is not one of `Mo`..`Su`.
pub fn parse_weekday(code: &str) -> Result<Weekday, ScheduleError> {
	WEEKDAYS
		.iter()
		.find(|(known, _)| *known == code)
		.map(|&(_, day)| day)
		.ok_or_else(|| ScheduleError::UnknownWeekday(code.to_string()))
}

/// RFC 5545 `BYDAY` code of a weekday.
#[must_use]
pub fn ical_weekday(day: Weekday) -> &'static str {
	match day {
		Weekday::Mon => "MO",
		Weekday::Tue => "TU",
		Weekday::Wed => "WE",
		Weekday::Thu => "TH",
		Weekday::Fri => "FR",
		Weekday::Sat => "SA",
		Weekday::Sun => "SU",
	}
}

/// The first and last day of a term, e.g. `01/06/2025 - 04/14/2025`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
	pub start: NaiveDate,
	pub end: NaiveDate,
}

impl FromStr for DateRange {
	type Err = ScheduleError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let error = || ScheduleError::DateRange(s.to_string());
		let (start, end) = s.split_once(" - ").ok_or_else(error)?;
		let start = NaiveDate::parse_from_str(start.trim(), DATE_FORMAT).map_err(|_| error())?;
		let end = NaiveDate::parse_from_str(end.trim(), DATE_FORMAT).map_err(|_| error())?;

		if end < start {
			return Err(error());
		}

		Ok(Self { start, end })
	}
}

/// The first date on or after `start` that falls on one of `weekdays`.
///
/// Returns `None` only when `weekdays` is empty.
#[must_use]
pub fn first_occurrence(start: NaiveDate, weekdays: &[Weekday]) -> Option<NaiveDate> {
	let from = start.weekday().num_days_from_monday();

	weekdays
		.iter()
		.map(|day| (day.num_days_from_monday() + 7 - from) % 7)
		.min()
		.map(|offset| start + Duration::days(i64::from(offset)))
}
