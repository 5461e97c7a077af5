use std::{fmt, fs::File, io::Read, path::Path};

use select::{
	document::Document,
	node::Node,
	predicate::{Class, Name},
};

use crate::error::{Error, Result, RowError};

/// Text shown in the "Days & Times" cell while a meeting is unscheduled.
pub const TBA: &str = "TBA";

const COURSE_HEADER: &str = "PAGROUPDIVIDER";
const STATUS_GRID: &str = "PSLEVEL3GRID";
const STATUS_ID: &str = "STATUS$";
const MEETING_ROW_ID: &str = "trCLASS_MTG_VW";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
	Enrolled,
	Dropped,
	Waiting,
	Other(String),
}

impl From<&str> for Status {
	fn from(s: &str) -> Self {
		match s {
			"Enrolled" => Self::Enrolled,
			"Dropped" => Self::Dropped,
			"Waiting" | "Wait Listed" => Self::Waiting,
			other => Self::Other(other.to_string()),
		}
	}
}

/// Cells of a class meeting row, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
	ClassNumber,
	Section,
	Component,
	DaysAndTimes,
	Room,
	Instructor,
	DateRange,
}

impl Column {
	pub const ALL: [Self; 7] = [
		Self::ClassNumber,
		Self::Section,
		Self::Component,
		Self::DaysAndTimes,
		Self::Room,
		Self::Instructor,
		Self::DateRange,
	];
	pub const COUNT: usize = Self::ALL.len();

	fn index(self) -> usize {
		self as usize
	}
}

impl fmt::Display for Column {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(match self {
			Self::ClassNumber => "class number",
			Self::Section => "section",
			Self::Component => "component",
			Self::DaysAndTimes => "days & times",
			Self::Room => "room",
			Self::Instructor => "instructor",
			Self::DateRange => "start/end date",
		})
	}
}

/// One row of a course's meeting table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseMeeting {
	pub course_name: String,
	pub class_number: String,
	pub section: String,
	pub component: String,
	pub meeting_pattern: String,
	pub room: String,
	pub instructor: String,
	pub date_range: String,
	pub enrollment_status: String,
}

impl CourseMeeting {
	#[must_use]
	pub fn status(&self) -> Status {
		Status::from(self.enrollment_status.as_str())
	}

	#[must_use]
	pub fn is_enrolled(&self) -> bool {
		self.status() == Status::Enrolled
	}

	#[must_use]
	pub fn is_tba(&self) -> bool {
		self.meeting_pattern == TBA
	}

	/// The part of the course name before its title, e.g. `COMP 248`.
	#[must_use]
	pub fn course_code(&self) -> &str {
		self.course_name
			.split_once(" - ")
			.map_or(self.course_name.as_str(), |(code, _)| code)
	}
}

/// Keeps only the meetings of sections the student is enrolled in.
pub fn enrolled(
	meetings: impl IntoIterator<Item = CourseMeeting>,
) -> impl Iterator<Item = CourseMeeting> {
	meetings.into_iter().filter(CourseMeeting::is_enrolled)
}

/// Reads a saved schedule page from `path`, or from stdin when no path is given.
///
/// # Errors
/// [`Error::InputNotFound`] if the page cannot be read and
/// [`Error::NoScheduleData`] if it contains no course sections.
pub fn parse_from_file<P: AsRef<Path>>(path: Option<P>) -> Result<Vec<CourseMeeting>> {
	let document = if let Some(path) = path {
		let path = path.as_ref();
		let read_error = |source| Error::InputNotFound {
			path: path.to_path_buf(),
			source,
		};

		File::open(path)
			.and_then(Document::from_read)
			.map_err(read_error)?
	} else {
		Document::from_read(std::io::stdin()).map_err(|source| Error::InputNotFound {
			path: "-".into(),
			source,
		})?
	};

	parse_document(&document)
}

/// # Errors
/// [`Error::InputNotFound`] if reading fails and [`Error::NoScheduleData`]
/// if the page contains no course sections.
pub fn parse_from_buf<R: Read>(buf: R) -> Result<Vec<CourseMeeting>> {
	let document = Document::from_read(buf).map_err(|source| Error::InputNotFound {
		path: "-".into(),
		source,
	})?;

	parse_document(&document)
}

/// # Errors
/// [`Error::NoScheduleData`] if the page contains no course sections.
pub fn parse_from_str(html: &str) -> Result<Vec<CourseMeeting>> {
	parse_document(&Document::from(html))
}

fn parse_document(document: &Document) -> Result<Vec<CourseMeeting>> {
	let mut headers = document.find(Class(COURSE_HEADER)).peekable();

	if headers.peek().is_none() {
		return Err(Error::NoScheduleData);
	}

	let mut meetings = Vec::new();

	for header in headers {
		let course_name = clean_text(&header.text());
		// header cell -> row -> table body holding the whole section
		let Some(group) = header.parent().and_then(|row| row.parent()) else {
			tracing::warn!(course = %course_name, "course header is not inside a table, skipping");
			continue;
		};

		let status = enrollment_status(group).unwrap_or_else(|| {
			tracing::warn!(course = %course_name, "no enrollment status found");
			String::new()
		});

		let mut prev = None::<CourseMeeting>;

		for (index, row) in group.find(is_meeting_row).enumerate() {
			match parse_row(row, &course_name, &status, prev.as_ref()) {
				Ok(meeting) => {
					tracing::debug!(
						course = %course_name,
						class = %meeting.class_number,
						pattern = %meeting.meeting_pattern,
						"read meeting row"
					);
					meetings.push(meeting.clone());
					prev = Some(meeting);
				}
				Err(err @ RowError::MalformedRow { .. }) => {
					tracing::debug!(course = %course_name, row = index, "skipping row: {err}");
				}
				Err(err) => {
					tracing::warn!(course = %course_name, row = index, "skipping row: {err}");
				}
			}
		}
	}

	Ok(meetings)
}

fn is_meeting_row(node: &Node) -> bool {
	node.is(Name("tr")) && node.attr("id").is_some_and(|id| id.starts_with(MEETING_ROW_ID))
}

/// The first status entry of a section.
fn enrollment_status(group: Node) -> Option<String> {
	group
		.find(Name("span"))
		.find(|span| span.attr("id").is_some_and(|id| id.starts_with(STATUS_ID)))
		.map(|span| clean_text(&span.text()))
		.or_else(|| {
			group
				.find(Class(STATUS_GRID))
				.next()?
				.find(Name("td"))
				.map(|td| clean_text(&td.text()))
				.find(|text| !text.is_empty())
		})
		.filter(|status| !status.is_empty())
}

/// Collapses whitespace, including the `&nbsp;` placeholders of empty cells.
fn clean_text(s: &str) -> String {
	s.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Cells(Vec<String>);

impl Cells {
	fn read(row: Node) -> Result<Self, RowError> {
		let cells = row
			.children()
			.filter(|node| node.is(Name("td")))
			.map(|td| clean_text(&td.text()))
			.collect::<Vec<_>>();

		if cells.len() < Column::COUNT {
			return Err(RowError::MalformedRow { cells: cells.len() });
		}

		Ok(Self(cells))
	}

	/// The cell's text, or `None` when it is blank.
	fn get(&self, column: Column) -> Option<&str> {
		self.0
			.get(column.index())
			.map(String::as_str)
			.filter(|text| !text.is_empty())
	}

	fn required(&self, column: Column) -> Result<String, RowError> {
		self.get(column)
			.map(str::to_string)
			.ok_or(RowError::MissingField { column })
	}

	/// Blank cells repeat the value of the class's previous meeting row.
	fn inherited(&self, column: Column, prev: Option<&String>) -> Result<String, RowError> {
		self.get(column)
			.map(str::to_string)
			.or_else(|| prev.cloned())
			.ok_or(RowError::MissingField { column })
	}

	fn optional(&self, column: Column) -> String {
		self.get(column).unwrap_or_default().to_string()
	}
}

fn parse_row(
	row: Node,
	course_name: &str,
	status: &str,
	prev: Option<&CourseMeeting>,
) -> Result<CourseMeeting, RowError> {
	let cells = Cells::read(row)?;

	Ok(CourseMeeting {
		course_name: course_name.to_string(),
		class_number: cells.inherited(Column::ClassNumber, prev.map(|p| &p.class_number))?,
		section: cells.inherited(Column::Section, prev.map(|p| &p.section))?,
		component: cells.inherited(Column::Component, prev.map(|p| &p.component))?,
		meeting_pattern: cells.required(Column::DaysAndTimes)?,
		room: cells.optional(Column::Room),
		instructor: cells.optional(Column::Instructor),
		date_range: cells.required(Column::DateRange)?,
		enrollment_status: status.to_string(),
	})
}
