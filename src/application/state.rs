//! Application state for the intake terminal client.
//!
//! [`App`] is the only owner of the field values and of the top level view
//! state. Presentation code reads it and calls its methods; nothing else
//! transitions the view.

use crate::domain::{
    Acknowledgement, ContactEcho, DocumentError, DomainError, DomainResult, Field, FieldKind,
    FieldStore, IntakeRecord, ResponseMode, ResultPayload, Step, StepSequencer,
    SubmissionOutcome, UseCasePreference,
};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Text of the modal alert raised whenever a submission fails.
pub const FAILURE_ALERT: &str = "Er is iets misgegaan. Probeer het opnieuw of controleer de URL.";

pub const LOADING_MESSAGES: [&str; 5] = [
    "Website scannen...",
    "Bedrijfsactiviteiten analyseren...",
    "Symbis Praatplaat model toepassen...",
    "Security & Privacy checks uitvoeren...",
    "Rapport opmaken in huisstijl...",
];

pub const LOADING_MESSAGE_INTERVAL: Duration = Duration::from_secs(3);

/// Identifies one submission attempt so late answers can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(u64);

impl SubmissionId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A frozen record on its way to the report service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub record: IntakeRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub wizard: StepSequencer,
    /// Message of the last failed submission, shown below the form
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadingState {
    pub submission: SubmissionId,
    /// Company name and email as entered, available before the service answers
    pub submitted: ContactEcho,
    pub started: Instant,
}

/// The top level phase of the client. Exactly one is active.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Form(FormState),
    Loading(LoadingState),
    Result(ResultPayload),
}

impl ViewState {
    fn fresh_form(error: Option<String>) -> Self {
        ViewState::Form(FormState {
            wizard: StepSequencer::default(),
            error,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Form(_) => "form",
            ViewState::Loading(_) => "loading",
            ViewState::Result(_) => "result",
        }
    }
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use symbis_scan::application::{App, ViewState};
///
/// let app = App::default();
/// assert!(matches!(app.view, ViewState::Form(_)));
/// assert_eq!(app.current_step().map(|step| step.number()), Some(1));
/// ```
#[derive(Debug)]
pub struct App {
    /// Values entered so far; kept across failed submissions
    pub fields: FieldStore,
    pub view: ViewState,
    /// Which kind of success response the service sends
    pub mode: ResponseMode,
    /// Index of the focused field among the visible fields of the step
    pub focus: usize,
    /// Cursor position, in characters, within the focused text field
    pub cursor_position: usize,
    /// Temporary hint or result of the last action
    pub status_message: Option<String>,
    /// Pending modal alerts, oldest first
    pub alerts: VecDeque<String>,
    /// Directory downloaded reports are written to
    pub download_dir: PathBuf,
    /// Where the report was saved, once downloaded
    pub saved_document: Option<PathBuf>,
    next_submission: u64,
}

impl Default for App {
    fn default() -> Self {
        Self::new(ResponseMode::default(), PathBuf::from("."))
    }
}

impl App {
    pub fn new(mode: ResponseMode, download_dir: PathBuf) -> Self {
        Self {
            fields: FieldStore::default(),
            view: ViewState::fresh_form(None),
            mode,
            focus: 0,
            cursor_position: 0,
            status_message: None,
            alerts: VecDeque::new(),
            download_dir,
            saved_document: None,
            next_submission: 0,
        }
    }

    pub fn form(&self) -> Option<&FormState> {
        match &self.view {
            ViewState::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn current_step(&self) -> Option<Step> {
        self.form().map(|form| form.wizard.step())
    }

    pub fn visible_fields(&self) -> Vec<Field> {
        self.form()
            .map(|form| form.wizard.visible_fields(&self.fields))
            .unwrap_or_default()
    }

    pub fn focused_field(&self) -> Option<Field> {
        let fields = self.visible_fields();
        fields.get(self.focus.min(fields.len().saturating_sub(1))).copied()
    }

    fn reset_focus(&mut self) {
        self.focus = 0;
        self.place_cursor_at_end();
    }

    fn place_cursor_at_end(&mut self) {
        self.cursor_position = self
            .focused_field()
            .map(|field| self.fields.get(field).chars().count())
            .unwrap_or(0);
    }

    pub fn focus_next(&mut self) {
        let count = self.visible_fields().len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
            self.place_cursor_at_end();
        }
    }

    pub fn focus_previous(&mut self) {
        let count = self.visible_fields().len();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
            self.place_cursor_at_end();
        }
    }

    /// Types a character into the focused field.
    ///
    /// Text fields insert at the cursor. The slider takes a digit (`0`
    /// meaning 10) and choices cycle on space.
    pub fn insert_char(&mut self, c: char) {
        let Some(field) = self.focused_field() else {
            return;
        };
        match field.kind() {
            FieldKind::Text | FieldKind::LongText => {
                let position = self.cursor_position;
                if let Some(text) = self.fields.text_mut(field) {
                    let index = byte_index(text, position);
                    text.insert(index, c);
                    self.cursor_position += 1;
                }
            }
            FieldKind::Range => {
                if let Some(digit) = c.to_digit(10) {
                    let value = if digit == 0 { 10 } else { digit };
                    self.fields.set(field, value.to_string());
                }
            }
            FieldKind::Choice | FieldKind::Preference => {
                if c == ' ' {
                    self.fields.cycle(field, true);
                }
            }
        }
    }

    pub fn delete_backward(&mut self) {
        let position = self.cursor_position;
        if position == 0 {
            return;
        }
        if let Some(text) = self.focused_field().and_then(|field| self.fields.text_mut(field)) {
            let index = byte_index(text, position - 1);
            text.remove(index);
            self.cursor_position -= 1;
        }
    }

    pub fn delete_forward(&mut self) {
        let position = self.cursor_position;
        if let Some(text) = self.focused_field().and_then(|field| self.fields.text_mut(field)) {
            if position < text.chars().count() {
                let index = byte_index(text, position);
                text.remove(index);
            }
        }
    }

    /// Left arrow: moves the text cursor, or selects the previous option.
    pub fn move_left(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if field.is_editable_text() {
            self.cursor_position = self.cursor_position.saturating_sub(1);
        } else {
            self.fields.cycle(field, false);
        }
    }

    /// Right arrow: moves the text cursor, or selects the next option.
    pub fn move_right(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if field.is_editable_text() {
            let len = self.fields.get(field).chars().count();
            if self.cursor_position < len {
                self.cursor_position += 1;
            }
        } else {
            self.fields.cycle(field, true);
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.place_cursor_at_end();
    }

    pub fn choose_use_case(&mut self, preference: UseCasePreference) {
        if self.current_step() == Some(Step::UseCases) {
            self.fields.choose_use_case(preference);
        }
    }

    /// Moves the wizard forward one step.
    ///
    /// # Errors
    ///
    /// Returns the validation gap when required fields of the current step
    /// are blank; the hint is also put in the status line.
    pub fn next_step(&mut self) -> DomainResult<Step> {
        let ViewState::Form(form) = &mut self.view else {
            return Err(DomainError::NotReadyToSubmit);
        };
        match form.wizard.advance(&self.fields) {
            Ok(step) => {
                self.status_message = None;
                self.reset_focus();
                Ok(step)
            }
            Err(err) => {
                self.status_message = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn previous_step(&mut self) -> bool {
        let ViewState::Form(form) = &mut self.view else {
            return false;
        };
        let moved = form.wizard.retreat();
        if moved {
            self.status_message = None;
            self.reset_focus();
        }
        moved
    }

    /// Enter on the form: advance, or submit from the last step.
    ///
    /// Returns the submission to hand to the dispatcher when one starts.
    pub fn confirm_step(&mut self) -> Option<Submission> {
        let last = self.form().is_some_and(|form| form.wizard.is_last());
        if last {
            match self.begin_submission() {
                Ok(submission) => Some(submission),
                Err(err) => {
                    self.status_message = Some(err.to_string());
                    None
                }
            }
        } else {
            let _ = self.next_step();
            None
        }
    }

    /// Freezes the record and switches to the loading view.
    ///
    /// The switch happens before any network activity; the caller performs
    /// the actual call with the returned [`Submission`].
    ///
    /// # Errors
    ///
    /// [`DomainError::NotReadyToSubmit`] outside the last form step, and
    /// [`DomainError::ValidationGap`] when a mandatory field is blank. The
    /// view is left untouched in both cases.
    pub fn begin_submission(&mut self) -> DomainResult<Submission> {
        let ViewState::Form(form) = &self.view else {
            return Err(DomainError::NotReadyToSubmit);
        };
        if !form.wizard.is_last() {
            return Err(DomainError::NotReadyToSubmit);
        }

        let record = self.fields.snapshot();
        let missing = record.missing_mandatory();
        if let Some(first) = missing.first() {
            let step = [Step::Company, Step::Maturity, Step::UseCases, Step::Contact]
                .into_iter()
                .find(|step| step.fields().contains(first))
                .unwrap_or(Step::Contact);
            return Err(DomainError::ValidationGap { step, missing });
        }

        self.next_submission += 1;
        let id = SubmissionId(self.next_submission);
        log::info!(
            "Submission {} started for company '{}'",
            id.value(),
            record.company_name
        );

        self.view = ViewState::Loading(LoadingState {
            submission: id,
            submitted: ContactEcho::submitted(&record),
            started: Instant::now(),
        });
        self.status_message = None;
        Ok(Submission { id, record })
    }

    /// Applies the outcome of a submission.
    ///
    /// Outcomes for anything but the submission currently loading are
    /// dropped. Returns whether the outcome was applied.
    pub fn complete_submission(&mut self, id: SubmissionId, outcome: SubmissionOutcome) -> bool {
        let submitted = match &self.view {
            ViewState::Loading(loading) if loading.submission == id => loading.submitted.clone(),
            _ => {
                log::warn!(
                    "Ignoring outcome of submission {} while in {} view",
                    id.value(),
                    self.view.name()
                );
                return false;
            }
        };

        match outcome {
            SubmissionOutcome::Success(Acknowledgement::Informational {
                message,
                company_name,
                email,
            }) => {
                log::info!("Submission {} acknowledged", id.value());
                self.view = ViewState::Result(ResultPayload::Informational {
                    message,
                    contact: submitted.confirm(company_name, email),
                });
            }
            SubmissionOutcome::Success(Acknowledgement::Document {
                document,
                company_name,
            }) => {
                log::info!(
                    "Submission {} returned a document of {} bytes",
                    id.value(),
                    document.len()
                );
                self.view = ViewState::Result(ResultPayload::Document {
                    document,
                    company_name,
                });
            }
            SubmissionOutcome::Failure(err) => {
                let message = err.user_message();
                log::warn!("Submission {} failed: {}", id.value(), message);
                self.view = ViewState::fresh_form(Some(message));
                self.reset_focus();
                self.raise_alert(FAILURE_ALERT);
            }
        }
        true
    }

    fn raise_alert(&mut self, message: &str) {
        self.alerts.push_back(message.to_string());
    }

    pub fn active_alert(&self) -> Option<&str> {
        self.alerts.front().map(String::as_str)
    }

    pub fn dismiss_alert(&mut self) {
        self.alerts.pop_front();
    }

    /// The report bytes and company name, when a document is on offer.
    pub fn document_to_download(&self) -> Option<(&[u8], &str)> {
        match &self.view {
            ViewState::Result(ResultPayload::Document {
                document,
                company_name,
            }) => Some((document.as_slice(), company_name.as_str())),
            _ => None,
        }
    }

    /// Processes the result of saving the report document.
    pub fn set_download_result(&mut self, result: Result<PathBuf, DocumentError>) {
        match result {
            Ok(path) => {
                self.status_message = Some(format!("Rapport opgeslagen als {}", path.display()));
                self.saved_document = Some(path);
            }
            Err(error) => {
                log::error!("Saving report failed: {}", error);
                self.status_message = Some(format!("Opslaan mislukt: {}", error));
            }
        }
    }

    /// Caption shown on the loading view, rotating every few seconds.
    pub fn loading_caption(&self, now: Instant) -> Option<&'static str> {
        match &self.view {
            ViewState::Loading(loading) => Some(loading_caption(
                now.saturating_duration_since(loading.started),
            )),
            _ => None,
        }
    }
}

pub fn loading_caption(elapsed: Duration) -> &'static str {
    let index = (elapsed.as_secs() / LOADING_MESSAGE_INTERVAL.as_secs()) as usize;
    LOADING_MESSAGES[index % LOADING_MESSAGES.len()]
}

fn byte_index(text: &str, char_position: usize) -> usize {
    text.char_indices()
        .nth(char_position)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}
