use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;
use rrule::{Frequency, NWeekday, RRule};

use crate::{
	config::Config,
	course::CourseMeeting,
	error::ScheduleError,
	schedule::{first_occurrence, ical_weekday, DateRange, Schedule},
};

const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// A `VALARM` that fires before each class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reminder {
	pub minutes: u32,
}

impl fmt::Display for Reminder {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		writeln!(f, "BEGIN:VALARM")?;
		writeln!(f, "TRIGGER:-PT{}M", self.minutes)?;
		writeln!(f, "ACTION:DISPLAY")?;
		writeln!(f, "DESCRIPTION:Reminder")?;
		writeln!(f, "END:VALARM")
	}
}

/// A class meeting repeating every week until the end of term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringEvent {
	pub summary: String,
	pub location: String,
	pub description: String,
	/// Wall-clock start of the first class, in `timezone`.
	pub start: NaiveDateTime,
	pub end: NaiveDateTime,
	/// Meeting days, Monday first.
	pub weekdays: Vec<Weekday>,
	/// Last day of term; the rule repeats until midnight of this day.
	pub until: NaiveDate,
	pub timezone: Tz,
	pub reminder: Option<Reminder>,
}

impl RecurringEvent {
	/// Builds the event for a meeting, or `None` when its schedule is TBA.
	///
	/// # Errors
	/// Any [`ScheduleError`] raised while reading the meeting's days, times or dates.
	pub fn from_meeting(
		meeting: &CourseMeeting,
		config: &Config,
	) -> Result<Option<Self>, ScheduleError> {
		if meeting.is_tba() {
			return Ok(None);
		}

		let schedule: Schedule = meeting.meeting_pattern.parse()?;
		let range: DateRange = meeting.date_range.parse()?;
		let weekdays = schedule.weekdays()?;
		let first = first_occurrence(range.start, &weekdays)
			.ok_or_else(|| ScheduleError::Format(meeting.meeting_pattern.clone()))?;

		Ok(Some(Self {
			summary: format!("{} - {}", meeting.course_code(), meeting.component),
			location: meeting.room.clone(),
			description: format!(
				"Course: {}\nClass Number: {}\nSection: {}\nInstructor: {}",
				meeting.course_name, meeting.class_number, meeting.section, meeting.instructor
			),
			start: first.and_time(schedule.start_time()?),
			end: first.and_time(schedule.end_time()?),
			weekdays,
			until: range.end,
			timezone: config.timezone,
			reminder: config.include_reminder.then_some(Reminder {
				minutes: config.reminder_minutes,
			}),
		}))
	}

	/// The `RRULE` value, e.g. `FREQ=WEEKLY;UNTIL=20250414T000000;WKST=SU;BYDAY=MO,WE`.
	#[must_use]
	pub fn rrule(&self) -> String {
		let by_day = self
			.weekdays
			.iter()
			.map(|&day| ical_weekday(day))
			.collect::<Vec<_>>()
			.join(",");

		format!(
			"FREQ=WEEKLY;UNTIL={}T000000;WKST=SU;BYDAY={by_day}",
			self.until.format("%Y%m%d")
		)
	}

	/// Start times of the first `limit` classes.
	///
	/// # Errors
	/// [`ScheduleError::Recurrence`] if the rule is rejected by the expander.
	pub fn occurrences(&self, limit: u16) -> Result<Vec<NaiveDateTime>, ScheduleError> {
		let tz = rrule::Tz::Tz(self.timezone);
		let localize = |at: NaiveDateTime| {
			tz.from_local_datetime(&at)
				.earliest()
				.ok_or_else(|| {
					ScheduleError::Recurrence(format!("{at} does not exist in {}", self.timezone))
				})
		};

		// the expander only accepts a UTC end for a zoned start
		let until = localize(self.until.and_time(NaiveTime::MIN))?.with_timezone(&rrule::Tz::UTC);
		let set = RRule::new(Frequency::Weekly)
			.until(until)
			.week_start(Weekday::Sun)
			.by_weekday(self.weekdays.iter().copied().map(NWeekday::Every).collect())
			.build(localize(self.start)?)
			.map_err(|e| ScheduleError::Recurrence(e.to_string()))?;

		Ok(set
			.all(limit)
			.dates
			.into_iter()
			.map(|date| date.naive_local())
			.collect())
	}
}

impl fmt::Display for RecurringEvent {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let tzid = self.timezone.name();

		writeln!(f, "BEGIN:VEVENT")?;
		writeln!(f, "SUMMARY:{}", escape_text(&self.summary))?;
		writeln!(f, "LOCATION:{}", escape_text(&self.location))?;
		writeln!(f, "DESCRIPTION:{}", escape_text(&self.description))?;
		writeln!(f, "STATUS:CONFIRMED")?;
		writeln!(f, "DTSTART;TZID={tzid}:{}", self.start.format(DATE_TIME_FORMAT))?;
		writeln!(f, "DTEND;TZID={tzid}:{}", self.end.format(DATE_TIME_FORMAT))?;
		writeln!(f, "RRULE:{}", self.rrule())?;

		if let Some(reminder) = &self.reminder {
			write!(f, "{reminder}")?;
		}

		writeln!(f, "END:VEVENT")
	}
}

/// Escapes an RFC 5545 TEXT value so it stays on one content line.
fn escape_text(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());

	for c in value.chars() {
		match c {
			'\\' => escaped.push_str("\\\\"),
			';' => escaped.push_str("\\;"),
			',' => escaped.push_str("\\,"),
			'\n' => escaped.push_str("\\n"),
			'\r' => {}
			c => escaped.push(c),
		}
	}

	escaped
}
