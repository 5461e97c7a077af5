//! Error types for schedule extraction and calendar generation.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::course::Column;

/// Errors that abort a run before any calendar is written.
#[derive(Error, Debug)]
pub enum Error {
	#[error("cannot read input `{}`", path.display())]
	InputNotFound {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("no course sections found; is this a saved class schedule page?")]
	NoScheduleData,

	#[error("cannot write calendar to `{}`", path.display())]
	Write {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

/// A meeting whose schedule cannot be turned into a recurring event.
///
/// Only the offending meeting is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
	#[error("unrecognized meeting pattern {0:?}")]
	Format(String),

	#[error("invalid time {0:?}")]
	Time(String),

	#[error("invalid date range {0:?}")]
	DateRange(String),

	#[error("unknown weekday code {0:?}")]
	UnknownWeekday(String),

	#[error("invalid recurrence rule: {0}")]
	Recurrence(String),
}

/// A meeting row that could not be read from the page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
	#[error("meeting row has {cells} cells, expected at least {}", Column::COUNT)]
	MalformedRow { cells: usize },

	#[error("meeting row has no {column}")]
	MissingField { column: Column },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
