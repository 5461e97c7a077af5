#![warn(clippy::pedantic)]

//! Turns a saved "My Class Schedule" page into an iCalendar file with one
//! weekly recurring event per enrolled class meeting.

use course::CourseMeeting;

pub mod calendar;
pub mod config;
pub mod course;
pub mod error;
pub mod event;
pub mod progress;
pub mod schedule;

pub use calendar::Calendar;
pub use chrono_tz::Tz;
pub use config::{Config, DEFAULT_REMINDER_MINUTES, DEFAULT_TIMEZONE};
pub use error::{Error, Result, RowError, ScheduleError};
pub use event::{RecurringEvent, Reminder};
pub use progress::{Outcome, Progress};

/// Result of generating a calendar from extracted meetings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
	pub calendar: Calendar,
	/// Meeting rows read from the page.
	pub extracted: usize,
	/// Rows belonging to enrolled sections.
	pub enrolled: usize,
	/// Enrolled meetings without a schedule yet.
	pub tba: usize,
	/// Enrolled meetings skipped because their schedule could not be read.
	pub failed: usize,
}

/// Builds the calendar for the enrolled meetings, in page order.
///
/// Meetings whose schedule cannot be read are logged and left out.
#[must_use]
pub fn synthesize(
	meetings: Vec<CourseMeeting>,
	config: &Config,
	progress: &mut impl Progress,
) -> Report {
	let extracted = meetings.len();
	let meetings = course::enrolled(meetings).collect::<Vec<_>>();
	let mut report = Report {
		extracted,
		enrolled: meetings.len(),
		..Report::default()
	};

	progress.start(meetings.len());

	for meeting in &meetings {
		let outcome = match RecurringEvent::from_meeting(meeting, config) {
			Ok(Some(event)) => {
				report.calendar.push(event);
				Outcome::Rendered
			}
			Ok(None) => {
				tracing::debug!(class = %meeting.class_number, "schedule is TBA, no event");
				report.tba += 1;
				Outcome::Tba
			}
			Err(err) => {
				tracing::warn!(
					course = %meeting.course_name,
					class = %meeting.class_number,
					"skipping meeting: {err}"
				);
				report.failed += 1;
				Outcome::Failed
			}
		};

		progress.meeting(meeting, outcome);
	}

	progress.finish();

	report
}

/// Builds the calendar for the enrolled meetings without progress reporting.
#[must_use]
pub fn create_calendar(meetings: Vec<CourseMeeting>, config: &Config) -> Calendar {
	synthesize(meetings, config, &mut ()).calendar
}

/// Reads the configured page, builds the calendar and writes it to the
/// configured output, if any.
///
/// # Errors
/// [`Error::InputNotFound`] and [`Error::NoScheduleData`] before anything is
/// written; [`Error::Write`] if the output cannot be written.
pub fn run(config: &Config, progress: &mut impl Progress) -> Result<Report> {
	let meetings = course::parse_from_file(config.input.as_deref())?;
	let report = synthesize(meetings, config, progress);

	tracing::info!(
		extracted = report.extracted,
		enrolled = report.enrolled,
		events = report.calendar.len(),
		tba = report.tba,
		failed = report.failed,
		"calendar generated"
	);

	if let Some(output) = &config.output {
		report.calendar.write_to(output)?;
	}

	Ok(report)
}
