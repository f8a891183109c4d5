//! HTTP client for the report-generation endpoint.

use crate::domain::{
    Acknowledgement, IntakeRecord, ReportService, ResponseMode, SubmissionError,
    SubmissionOutcome, GENERIC_FAILURE_MESSAGE,
};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const REPORT_ENDPOINT_PATH: &str = "/api/generate-report";

pub const DEFAULT_ACKNOWLEDGEMENT: &str =
    "Bedankt! Je rapport wordt binnen enkele minuten gemaild.";

/// The JSON body sent to the report endpoint. Every key is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPayload<'a> {
    pub company_name: &'a str,
    pub url: &'a str,
    pub employees: &'a str,
    pub industry: &'a str,
    pub ai_experience: &'a str,
    pub chatgpt_policy: &'a str,
    pub use_case_preference: &'a str,
    pub use_case_text: &'a str,
    pub email: &'a str,
    pub name: &'a str,
}

impl<'a> From<&'a IntakeRecord> for ReportPayload<'a> {
    fn from(record: &'a IntakeRecord) -> Self {
        Self {
            company_name: &record.company_name,
            url: &record.url,
            employees: &record.employees,
            industry: &record.industry,
            ai_experience: &record.ai_experience,
            chatgpt_policy: &record.chatgpt_policy,
            use_case_preference: &record.use_case_preference,
            use_case_text: &record.use_case_text,
            email: &record.email,
            name: &record.name,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct AcknowledgementBody {
    message: Option<String>,
    company_name: Option<String>,
    email: Option<String>,
}

/// Blocking client performing a single POST per submission.
pub struct HttpReportClient {
    client: Client,
    endpoint: String,
    mode: ResponseMode,
}

impl HttpReportClient {
    /// Builds a client for the service at `base_url`.
    ///
    /// No request timeout is configured; the call waits as long as the
    /// service needs to produce the report.
    pub fn new(base_url: &str, mode: ResponseMode) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self {
            client,
            endpoint: endpoint_url(base_url),
            mode,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }
}

impl ReportService for HttpReportClient {
    fn submit(&self, record: &IntakeRecord) -> SubmissionOutcome {
        let body = match serde_json::to_vec(&ReportPayload::from(record)) {
            Ok(body) => body,
            Err(e) => return SubmissionOutcome::Failure(SubmissionError::Transport(e.to_string())),
        };

        log::info!("POST {} ({} mode)", self.endpoint, self.mode);
        let response = match self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
        {
            Ok(response) => response,
            Err(e) => {
                log::error!("Report request failed: {}", e);
                return SubmissionOutcome::Failure(SubmissionError::Transport(e.to_string()));
            }
        };

        let status = response.status();
        let outcome = match response.bytes() {
            Ok(bytes) => classify_response(self.mode, status, &bytes, record),
            Err(e) if status.is_success() => {
                SubmissionOutcome::Failure(SubmissionError::MalformedResponse(e.to_string()))
            }
            Err(_) => classify_response(self.mode, status, &[], record),
        };

        match &outcome {
            SubmissionOutcome::Success(_) => log::info!("Report service answered {}", status),
            SubmissionOutcome::Failure(err) => {
                log::warn!("Report service answered {}: {}", status, err)
            }
        }
        outcome
    }
}

pub fn endpoint_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), REPORT_ENDPOINT_PATH)
}

/// Turns a completed HTTP exchange into a [`SubmissionOutcome`].
pub fn classify_response(
    mode: ResponseMode,
    status: StatusCode,
    body: &[u8],
    record: &IntakeRecord,
) -> SubmissionOutcome {
    if !status.is_success() {
        return SubmissionOutcome::Failure(SubmissionError::Service {
            status: status.as_u16(),
            message: failure_message(status, body),
        });
    }

    match mode {
        ResponseMode::Informational => match serde_json::from_slice::<AcknowledgementBody>(body) {
            Ok(ack) => SubmissionOutcome::Success(Acknowledgement::Informational {
                message: ack
                    .message
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| DEFAULT_ACKNOWLEDGEMENT.to_string()),
                company_name: ack.company_name,
                email: ack.email,
            }),
            Err(e) => SubmissionOutcome::Failure(SubmissionError::MalformedResponse(format!(
                "Ongeldig antwoord van de server: {}",
                e
            ))),
        },
        ResponseMode::Document => {
            if body.is_empty() {
                SubmissionOutcome::Failure(SubmissionError::MalformedResponse(
                    "Leeg rapport ontvangen".to_string(),
                ))
            } else {
                SubmissionOutcome::Success(Acknowledgement::Document {
                    document: body.to_vec(),
                    company_name: record.company_name.clone(),
                })
            }
        }
    }
}

/// Body text when present, then the status line, then the generic text.
fn failure_message(status: StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    match status.canonical_reason() {
        Some(reason) => format!("Error: {}", reason),
        None => GENERIC_FAILURE_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn acme_record() -> IntakeRecord {
        IntakeRecord {
            company_name: "acme".into(),
            email: "info@acme.nl".into(),
            ..IntakeRecord::with_form_defaults()
        }
    }

    #[test]
    fn test_payload_contains_all_keys_with_empty_defaults() {
        let record = IntakeRecord::default();
        let value = serde_json::to_value(ReportPayload::from(&record)).unwrap();
        let object = value.as_object().unwrap();

        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        let mut expected = vec![
            "company_name",
            "url",
            "employees",
            "industry",
            "ai_experience",
            "chatgpt_policy",
            "use_case_preference",
            "use_case_text",
            "email",
            "name",
        ];
        let mut sorted = keys.clone();
        sorted.sort();
        expected.sort();
        assert_eq!(sorted, expected);
        assert!(object.values().all(|value| value == ""));
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://localhost:7071/"),
            "http://localhost:7071/api/generate-report"
        );
        assert_eq!(
            endpoint_url("https://scan.symbis.nl"),
            "https://scan.symbis.nl/api/generate-report"
        );
    }

    #[test]
    fn test_server_values_are_carried_as_confirmation() {
        let body = br#"{"message":"Bedankt!","company_name":"Acme","email":"a@acme.nl"}"#;
        let outcome = classify_response(
            ResponseMode::Informational,
            StatusCode::ACCEPTED,
            body,
            &acme_record(),
        );
        assert_eq!(
            outcome,
            SubmissionOutcome::Success(Acknowledgement::Informational {
                message: "Bedankt!".into(),
                company_name: Some("Acme".into()),
                email: Some("a@acme.nl".into()),
            })
        );
    }

    #[test]
    fn test_missing_message_uses_default_acknowledgement() {
        let outcome =
            classify_response(ResponseMode::Informational, StatusCode::OK, b"{}", &acme_record());
        assert_eq!(
            outcome,
            SubmissionOutcome::Success(Acknowledgement::Informational {
                message: DEFAULT_ACKNOWLEDGEMENT.into(),
                company_name: None,
                email: None,
            })
        );
    }

    #[test]
    fn test_unparsable_success_body_is_malformed() {
        let outcome = classify_response(
            ResponseMode::Informational,
            StatusCode::OK,
            b"<html>",
            &acme_record(),
        );
        assert!(matches!(
            outcome,
            SubmissionOutcome::Failure(SubmissionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_error_body_text_becomes_message() {
        let outcome = classify_response(
            ResponseMode::Document,
            StatusCode::INTERNAL_SERVER_ERROR,
            b"Server exploded\n",
            &acme_record(),
        );
        assert_eq!(
            outcome,
            SubmissionOutcome::Failure(SubmissionError::Service {
                status: 500,
                message: "Server exploded".into(),
            })
        );
    }

    #[test]
    fn test_empty_error_body_uses_status_line() {
        let outcome = classify_response(
            ResponseMode::Informational,
            StatusCode::BAD_GATEWAY,
            b"",
            &acme_record(),
        );
        let SubmissionOutcome::Failure(err) = outcome else {
            panic!("expected failure");
        };
        assert_eq!(err.user_message(), "Error: Bad Gateway");
    }

    #[test]
    fn test_unknown_status_without_body_uses_generic_message() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(failure_message(status, b""), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_document_carries_client_company_name() {
        let outcome = classify_response(
            ResponseMode::Document,
            StatusCode::OK,
            b"%PDF-1.4",
            &acme_record(),
        );
        assert_eq!(
            outcome,
            SubmissionOutcome::Success(Acknowledgement::Document {
                document: b"%PDF-1.4".to_vec(),
                company_name: "acme".into(),
            })
        );
    }

    #[test]
    fn test_empty_document_is_malformed() {
        let outcome =
            classify_response(ResponseMode::Document, StatusCode::OK, b"", &acme_record());
        assert!(!outcome.is_success());
    }
}
