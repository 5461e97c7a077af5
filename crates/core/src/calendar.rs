use std::{
	fmt, fs,
	path::{Path, PathBuf},
};

use crate::{
	error::{Error, Result},
	event::RecurringEvent,
};

const HEADER: &str = "BEGIN:VCALENDAR\nVERSION:2.0\nCALSCALE:GREGORIAN\n";
const FOOTER: &str = "END:VCALENDAR";

/// The output document, events kept in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calendar {
	events: Vec<RecurringEvent>,
}

impl Calendar {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, event: RecurringEvent) {
		self.events.push(event);
	}

	#[must_use]
	pub fn events(&self) -> &[RecurringEvent] {
		&self.events
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.events.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}

	/// Writes the whole document to `path` in one go.
	///
	/// The text goes to `<path>.tmp` which is then renamed over `path`, so a
	/// failed write never leaves a truncated calendar behind.
	///
	/// # Errors
	/// [`Error::Write`] if the file cannot be written or moved into place.
	pub fn write_to(&self, path: &Path) -> Result<()> {
		let tmp_path = sibling_tmp(path);
		let write_error = |source| Error::Write {
			path: path.to_path_buf(),
			source,
		};

		if let Err(source) = fs::write(&tmp_path, self.to_string()) {
			let _ = fs::remove_file(&tmp_path);
			return Err(write_error(source));
		}

		fs::rename(&tmp_path, path).map_err(|source| {
			let _ = fs::remove_file(&tmp_path);
			write_error(source)
		})?;

		tracing::debug!(path = %path.display(), events = self.len(), "calendar written");

		Ok(())
	}
}

/// `calendar.ics` becomes `calendar.ics.tmp`, leaving `calendar.tmp` alone.
fn sibling_tmp(path: &Path) -> PathBuf {
	let mut name = path.as_os_str().to_owned();
	name.push(".tmp");
	PathBuf::from(name)
}

impl FromIterator<RecurringEvent> for Calendar {
	fn from_iter<I: IntoIterator<Item = RecurringEvent>>(iter: I) -> Self {
		Self {
			events: iter.into_iter().collect(),
		}
	}
}

impl fmt::Display for Calendar {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(HEADER)?;

		for event in &self.events {
			write!(f, "{event}")?;
		}

		f.write_str(FOOTER)
	}
}
