//! Runs report submissions off the UI thread.

use super::state::{Submission, SubmissionId};
use crate::domain::{ReportService, SubmissionError, SubmissionOutcome};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Hands submissions to a worker thread and collects their outcomes.
///
/// Each submission gets its own worker performing one blocking call. The
/// outcome comes back tagged with the submission id.
pub struct SubmissionDispatcher {
    service: Arc<dyn ReportService>,
    sender: Sender<(SubmissionId, SubmissionOutcome)>,
    receiver: Receiver<(SubmissionId, SubmissionOutcome)>,
}

impl SubmissionDispatcher {
    pub fn new(service: Arc<dyn ReportService>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            service,
            sender,
            receiver,
        }
    }

    pub fn dispatch(&self, submission: Submission) {
        let id = submission.id;
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();

        let spawned = thread::Builder::new()
            .name(format!("report-submission-{}", id.value()))
            .spawn(move || {
                let outcome = service.submit(&submission.record);
                // The receiver is gone only when the app is shutting down.
                let _ = sender.send((id, outcome));
            });

        if let Err(e) = spawned {
            log::error!("Could not start submission worker: {}", e);
            let _ = self.sender.send((
                id,
                SubmissionOutcome::Failure(SubmissionError::Transport(e.to_string())),
            ));
        }
    }

    /// Returns a finished outcome without waiting.
    pub fn try_next(&self) -> Option<(SubmissionId, SubmissionOutcome)> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for the next finished outcome.
    pub fn next_timeout(&self, timeout: Duration) -> Option<(SubmissionId, SubmissionOutcome)> {
        match self.receiver.recv_timeout(timeout) {
            Ok(item) => Some(item),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
