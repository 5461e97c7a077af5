use crate::course::CourseMeeting;

/// What happened to an enrolled meeting during calendar generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
	Rendered,
	Tba,
	Failed,
}

/// Observer notified while events are generated.
///
/// Implementations only see shared references and cannot change the output.
pub trait Progress {
	fn start(&mut self, _total: usize) {}

	fn meeting(&mut self, _meeting: &CourseMeeting, _outcome: Outcome) {}

	fn finish(&mut self) {}
}

impl Progress for () {}
