//! Service seams the application layer depends on.

use super::models::{IntakeRecord, SubmissionOutcome};

/// Something that turns a frozen intake record into a report.
///
/// Implementations perform exactly one attempt per call and never panic on
/// remote errors; every failure is folded into
/// [`SubmissionOutcome::Failure`].
pub trait ReportService: Send + Sync {
    fn submit(&self, record: &IntakeRecord) -> SubmissionOutcome;
}

impl<F> ReportService for F
where
    F: Fn(&IntakeRecord) -> SubmissionOutcome + Send + Sync,
{
    fn submit(&self, record: &IntakeRecord) -> SubmissionOutcome {
        self(record)
    }
}
