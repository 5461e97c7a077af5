//! End-to-end tests over a saved schedule page.

use std::{fs, path::PathBuf};

use cu2ics_core::{course, run, synthesize, Config, Error};

fn fixture_path() -> PathBuf {
	PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/schedule.html"))
}

fn fixture() -> String {
	fs::read_to_string(fixture_path()).expect("schedule.html fixture must exist")
}

fn scratch_dir(name: &str) -> PathBuf {
	let dir = std::env::temp_dir().join(format!("cu2ics-{name}-{}", std::process::id()));
	fs::create_dir_all(&dir).unwrap();
	dir
}

#[test]
fn extracts_rows_in_page_order() {
	let meetings = course::parse_from_str(&fixture()).unwrap();
	let classes = meetings
		.iter()
		.map(|m| (m.course_code(), m.class_number.as_str(), m.enrollment_status.as_str()))
		.collect::<Vec<_>>();

	assert_eq!(
		classes,
		[
			("COMP 248", "4211", "Enrolled"),
			("COMP 248", "4212", "Enrolled"),
			("COMP 248", "4212", "Enrolled"),
			("MATH 205", "3150", "Enrolled"),
			("MATH 205", "3151", "Enrolled"),
			("ENGR 201", "5010", "Dropped"),
			("SOEN 287", "6120", "Wait Listed"),
		]
	);
}

#[test]
fn continuation_row_inherits_class() {
	let meetings = course::parse_from_str(&fixture()).unwrap();
	let second_tutorial = &meetings[2];

	assert_eq!(second_tutorial.section, "AA AI");
	assert_eq!(second_tutorial.component, "Tutorial");
	assert_eq!(second_tutorial.meeting_pattern, "Tu 4:00PM - 5:40PM");
	assert_eq!(second_tutorial.room, "H 603 SGW");
}

#[test]
fn entities_are_decoded_in_course_names() {
	let meetings = course::parse_from_str(&fixture()).unwrap();

	assert_eq!(meetings[3].course_name, "MATH 205 - Differential & Integral Calculus II");
}

#[test]
fn buffered_and_string_input_agree() {
	let html = fixture();

	assert_eq!(
		course::parse_from_buf(html.as_bytes()).unwrap(),
		course::parse_from_str(&html).unwrap()
	);
}

#[test]
fn calendar_has_one_event_per_enrolled_meeting() {
	let meetings = course::parse_from_str(&fixture()).unwrap();
	let report = synthesize(meetings, &Config::default(), &mut ());
	let text = report.calendar.to_string();

	assert_eq!(report.extracted, 7);
	assert_eq!(report.enrolled, 5);
	assert_eq!(report.tba, 1);
	assert_eq!(report.failed, 0);
	assert_eq!(report.calendar.len(), 4);
	assert_eq!(text.matches("BEGIN:VEVENT").count(), 4);
	assert_eq!(text.matches("BEGIN:VALARM").count(), 4);

	let summaries = text
		.lines()
		.filter_map(|line| line.strip_prefix("SUMMARY:"))
		.collect::<Vec<_>>();

	assert_eq!(
		summaries,
		["COMP 248 - Lecture", "COMP 248 - Tutorial", "COMP 248 - Tutorial", "MATH 205 - Lecture"]
	);
}

#[test]
fn dropped_and_waitlisted_courses_are_left_out() {
	let meetings = course::parse_from_str(&fixture()).unwrap();
	let text = synthesize(meetings, &Config::default(), &mut ()).calendar.to_string();

	assert!(!text.contains("ENGR 201"));
	assert!(!text.contains("SOEN 287"));
}

#[test]
fn first_classes_and_rules() {
	let meetings = course::parse_from_str(&fixture()).unwrap();
	let text = synthesize(meetings, &Config::default(), &mut ()).calendar.to_string();

	for expected in [
		"DTSTART;TZID=America/New_York:20250106T101500\nDTEND;TZID=America/New_York:20250106T113000\nRRULE:FREQ=WEEKLY;UNTIL=20250414T000000;WKST=SU;BYDAY=MO,WE\n",
		"DTSTART;TZID=America/New_York:20250110T084500\nDTEND;TZID=America/New_York:20250110T102500\nRRULE:FREQ=WEEKLY;UNTIL=20250414T000000;WKST=SU;BYDAY=FR\n",
		"DTSTART;TZID=America/New_York:20250107T160000\nDTEND;TZID=America/New_York:20250107T174000\nRRULE:FREQ=WEEKLY;UNTIL=20250414T000000;WKST=SU;BYDAY=TU\n",
		"DTSTART;TZID=America/New_York:20250107T131500\nDTEND;TZID=America/New_York:20250107T143000\nRRULE:FREQ=WEEKLY;UNTIL=20250414T000000;WKST=SU;BYDAY=TU,TH\n",
	] {
		assert!(text.contains(expected), "missing:\n{expected}");
	}

	assert!(text.contains(
		"DESCRIPTION:Course: MATH 205 - Differential & Integral Calculus II\\nClass Number: 3150\\nSection: EC\\nInstructor: John Smith\n"
	));
	assert!(text.starts_with("BEGIN:VCALENDAR\nVERSION:2.0\nCALSCALE:GREGORIAN\nBEGIN:VEVENT\n"));
	assert!(text.ends_with("END:VEVENT\nEND:VCALENDAR"));
}

#[test]
fn run_writes_the_configured_output() {
	let dir = scratch_dir("run");
	let output = dir.join("calendar.ics");
	let config = Config {
		input: Some(fixture_path()),
		output: Some(output.clone()),
		..Config::default()
	};

	let report = run(&config, &mut ()).unwrap();

	assert_eq!(fs::read_to_string(&output).unwrap(), report.calendar.to_string());
	assert!(!dir.join("calendar.ics.tmp").exists());

	fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_input_is_reported_before_writing() {
	let dir = scratch_dir("missing");
	let output = dir.join("calendar.ics");
	let config = Config {
		input: Some(dir.join("nope.html")),
		output: Some(output.clone()),
		..Config::default()
	};

	let err = run(&config, &mut ()).unwrap_err();

	assert!(matches!(err, Error::InputNotFound { .. }));
	assert!(!output.exists());

	fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn page_without_schedule_writes_nothing() {
	let dir = scratch_dir("no-schedule");
	let input = dir.join("login.html");
	let output = dir.join("calendar.ics");
	fs::write(&input, "<html><body><form id=\"login\"><input name=\"userid\"></form></body></html>").unwrap();
	let config = Config {
		input: Some(input),
		output: Some(output.clone()),
		..Config::default()
	};

	let err = run(&config, &mut ()).unwrap_err();

	assert!(matches!(err, Error::NoScheduleData));
	assert!(!output.exists());

	fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn only_dropped_courses_give_an_empty_calendar() {
	let html = fixture().replace(">Enrolled<", ">Dropped<");
	let meetings = course::parse_from_str(&html).unwrap();
	let report = synthesize(meetings, &Config::default(), &mut ());

	assert_eq!(report.enrolled, 0);
	assert_eq!(
		report.calendar.to_string(),
		"BEGIN:VCALENDAR\nVERSION:2.0\nCALSCALE:GREGORIAN\nEND:VCALENDAR"
	);
}
