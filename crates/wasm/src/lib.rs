#![warn(clippy::pedantic)]

use cu2ics_core::Config;
use wasm_bindgen::{prelude::wasm_bindgen, JsError};

/// Converts a saved schedule page to iCalendar text.
///
/// # Errors
/// Fails if the page contains no course sections.
#[wasm_bindgen]
pub fn from_html(html: &str, include_reminder: Option<bool>) -> Result<String, JsError> {
	let meetings = cu2ics_core::course::parse_from_str(html)?;
	let config = Config {
		include_reminder: include_reminder.unwrap_or(true),
		..Config::default()
	};
	let calendar = cu2ics_core::create_calendar(meetings, &config);

	Ok(calendar.to_string())
}
