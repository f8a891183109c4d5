use super::models::Field;
use super::wizard::Step;

pub const GENERIC_FAILURE_MESSAGE: &str = "Er is iets misgegaan bij het genereren.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Required fields are blank, so the wizard refuses to move on.
    ValidationGap { step: Step, missing: Vec<Field> },
    UnknownField(String),
    /// Submission attempted anywhere but the last step of the form.
    NotReadyToSubmit,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::ValidationGap { step, missing } => {
                let labels: Vec<&str> = missing.iter().map(|field| field.label()).collect();
                write!(
                    f,
                    "Stap {}: vul de verplichte velden in ({})",
                    step.number(),
                    labels.join(", ")
                )
            }
            DomainError::UnknownField(name) => {
                write!(f, "Unknown intake field: {}", name)
            }
            DomainError::NotReadyToSubmit => {
                write!(f, "Submission is only possible from the last step of the form")
            }
        }
    }
}

impl std::error::Error for DomainError {}

pub type DomainResult<T> = Result<T, DomainError>;

/// Why a report submission did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The request never produced a response.
    Transport(String),
    /// The service answered with a non-success status.
    Service { status: u16, message: String },
    /// The service answered with success but the body was unusable.
    MalformedResponse(String),
}

impl SubmissionError {
    /// The text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        let message = match self {
            SubmissionError::Transport(message) => message,
            SubmissionError::Service { message, .. } => message,
            SubmissionError::MalformedResponse(message) => message,
        };
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message.clone()
        }
    }
}

impl std::fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for SubmissionError {}

#[derive(Debug)]
pub enum DocumentError {
    /// The derived file name would leave the download directory.
    InvalidFileName(String),
    Io(std::io::Error),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::InvalidFileName(name) => {
                write!(f, "Invalid file name: {}", name)
            }
            DocumentError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Io(err) => Some(err),
            DocumentError::InvalidFileName(_) => None,
        }
    }
}

impl From<std::io::Error> for DocumentError {
    fn from(err: std::io::Error) -> Self {
        DocumentError::Io(err)
    }
}
